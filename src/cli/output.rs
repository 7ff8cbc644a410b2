//! Varbind rendering.
//!
//! Lines come out as `oid = value`, `oid value` (no equals) or `value`
//! (varbind-only). Values carry net-snmp style type labels while hints are
//! enabled; `-Oq`/`-OQ` strip labels and hint processing.

use super::args::{OutputOptions, StringMode};
use crate::format::{display_hint, hex, timeticks};
use crate::mib::Mib;
use crate::oid::Oid;
use crate::value::Value;
use crate::varbind::VarBind;

/// Renders varbinds against a MIB and a set of output options.
pub struct Printer<'a> {
    mib: &'a Mib,
    opts: OutputOptions,
}

impl<'a> Printer<'a> {
    pub fn new(mib: &'a Mib, opts: OutputOptions) -> Self {
        Self { mib, opts }
    }

    /// Render the OID part in the configured format.
    pub fn render_oid(&self, oid: &Oid) -> String {
        self.mib.render_oid(oid, self.opts.oid_format)
    }

    /// Render one output line, without the trailing newline.
    pub fn render_varbind(&self, vb: &VarBind) -> String {
        let value = self.render_value(&vb.oid, &vb.value);
        if self.opts.varbind_only {
            value
        } else if self.opts.print_equals {
            format!("{} = {}", self.render_oid(&vb.oid), value)
        } else {
            format!("{} {}", self.render_oid(&vb.oid), value)
        }
    }

    /// Render a value; `oid` selects the MIB object for hints and enums.
    pub fn render_value(&self, oid: &Oid, value: &Value) -> String {
        if !self.opts.hint {
            return self.render_plain(value);
        }

        match value {
            Value::Boolean(b) => format!("BOOLEAN: {b}"),
            Value::Integer(v) => self.render_integer(oid, *v),
            Value::OctetString(bytes) => self.render_octet_string(oid, bytes),
            Value::Null => "NULL".to_string(),
            Value::ObjectIdentifier(target) => {
                format!("OID: {}", self.render_oid(target))
            }
            Value::IpAddress(a) => {
                format!("IpAddress: {}.{}.{}.{}", a[0], a[1], a[2], a[3])
            }
            Value::Counter32(v) => format!("Counter32: {v}"),
            Value::Gauge32(v) => format!("Gauge32: {v}"),
            Value::TimeTicks(v) => format!("Timeticks: {}", timeticks(*v)),
            Value::Opaque(bytes) => format!("Opaque: {}", hex::encode_spaced(bytes)),
            Value::Counter64(v) => format!("Counter64: {v}"),
            Value::NoSuchObject => {
                "No Such Object available on this agent at this OID".to_string()
            }
            Value::NoSuchInstance => {
                "No Such Instance currently exists at this OID".to_string()
            }
            Value::EndOfMibView => {
                "No more variables left in this MIB View (It is past the end of the MIB tree)"
                    .to_string()
            }
            Value::Unknown { tag, data } => {
                format!("Unknown (tag {tag:#04x}): {}", hex::encode_spaced(data))
            }
        }
    }

    fn render_integer(&self, oid: &Oid, v: i64) -> String {
        if let Some((_, node)) = self.mib.longest_prefix(oid) {
            if let Some(label) = node.enum_label(v) {
                return format!("INTEGER: {label}({v})");
            }
            if let Some(hint) = &node.hint
                && let Some(formatted) = display_hint::apply_integer(hint, v)
            {
                return format!("INTEGER: {formatted}");
            }
        }
        format!("INTEGER: {v}")
    }

    fn render_octet_string(&self, oid: &Oid, bytes: &[u8]) -> String {
        match self.opts.string_mode {
            StringMode::Ascii => format!("STRING: \"{}\"", lossy_ascii(bytes)),
            StringMode::Hex => format!("Hex-STRING: {}", hex::encode_spaced(bytes)),
            StringMode::Default => {
                if let Some(hint) = self.mib.hint_for(oid) {
                    let applied = display_hint::apply(hint, bytes);
                    if is_text_hint(hint) {
                        format!("STRING: \"{applied}\"")
                    } else {
                        format!("STRING: {applied}")
                    }
                } else if is_printable(bytes) {
                    format!("STRING: \"{}\"", String::from_utf8_lossy(bytes))
                } else {
                    format!("Hex-STRING: {}", hex::encode_spaced(bytes))
                }
            }
        }
    }

    /// Bare values for `-Oq`/`-OQ`: no labels, no hints, timeticks decimal.
    fn render_plain(&self, value: &Value) -> String {
        match value {
            Value::OctetString(bytes) | Value::Opaque(bytes) => match self.opts.string_mode {
                StringMode::Hex => hex::encode_spaced(bytes),
                StringMode::Ascii => lossy_ascii(bytes),
                StringMode::Default => {
                    if is_printable(bytes) {
                        String::from_utf8_lossy(bytes).into_owned()
                    } else {
                        format!("0x{}", hex::encode(bytes))
                    }
                }
            },
            Value::ObjectIdentifier(target) => self.render_oid(target),
            Value::NoSuchObject => {
                "No Such Object available on this agent at this OID".to_string()
            }
            Value::NoSuchInstance => {
                "No Such Instance currently exists at this OID".to_string()
            }
            Value::EndOfMibView => {
                "No more variables left in this MIB View (It is past the end of the MIB tree)"
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Printable ASCII plus whitespace, and nothing else.
fn is_printable(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| b.is_ascii_graphic() || b == b' ' || b == b'\t' || b == b'\n')
}

/// Replace non-printable bytes with `.` (forced ASCII mode).
fn lossy_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// A text-only hint (`255a` and friends) keeps the quotes; structured
/// hints like `1x:` drop them.
fn is_text_hint(hint: &str) -> bool {
    hint.chars().all(|c| c.is_ascii_digit() || c == 'a')
}
