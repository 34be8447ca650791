//! Extracts the handful of jackd settings worth showing in the tooltip from a
//! live process's argument vector.
//!
//! jackd accepts both `-r44100` and `-r 44100`. When a recognised flag is
//! exactly two characters long, the following token is its value and is not
//! inspected again.

use serde::{Deserialize, Serialize};

/// Descriptive settings of a running jackd, as passed on its command line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames_per_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods_per_buffer: Option<String>,
}

impl JackInfo {
    /// One `label: value` line per known field, in a fixed order.
    pub fn describe(&self) -> String {
        let fields = [
            ("driver", &self.driver),
            ("fs", &self.sample_rate),
            ("frames/period", &self.frames_per_period),
            ("periods/buffer", &self.periods_per_buffer),
        ];

        let mut out = String::new();
        for (label, value) in fields {
            if let Some(value) = value {
                out.push_str(label);
                out.push_str(": ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out.trim_end().to_string()
    }

    fn slot(&mut self, flag: &str) -> Option<&mut Option<String>> {
        match flag {
            "-d" => Some(&mut self.driver),
            "-r" => Some(&mut self.sample_rate),
            "-p" => Some(&mut self.frames_per_period),
            "-n" => Some(&mut self.periods_per_buffer),
            _ => None,
        }
    }
}

/// Parses `argv` (including `argv[0]`) into a [`JackInfo`].
///
/// The first occurrence of a flag wins: once a driver is selected, jackd hands
/// every later argument to that driver, where `-d` names the device instead.
/// A bare flag at the very end of `argv` has no value and is ignored.
pub fn parse_info<S: AsRef<str>>(argv: &[S]) -> JackInfo {
    let mut info = JackInfo::default();
    let mut tokens = argv.iter().map(|s| AsRef::<str>::as_ref(s)).skip(1);

    while let Some(token) = tokens.next() {
        let Some(flag) = token.get(..2) else { continue };
        let Some(slot) = info.slot(flag) else { continue };

        let value = if token.len() == 2 {
            tokens.next()
        } else {
            Some(&token[2..])
        };

        if slot.is_none() {
            *slot = value.map(str::to_string);
        }
    }

    info
}
