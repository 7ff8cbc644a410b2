//! Command-line argument structures and the grouped-flag lexers.
//!
//! Clap handles the subcommand tree and the simple options; the `-O` and
//! `-C` values are getopt-style letter groups and are lexed by hand.

use crate::error::{Error, Result};
use crate::mib::OidFormat;
use crate::version::Version;
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

/// SNMPv1/v2c command-line client.
#[derive(Debug, Parser)]
#[command(name = "snmp", version, about = "SNMPv1/v2c client", max_term_width = 100)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// GET one or more OIDs.
    Get {
        #[command(flatten)]
        common: CommonArgs,
        /// Agent address (host, host:port, udp:/tcp:/udp6:/tcp6:/unix: forms).
        agent: String,
        /// OIDs, numeric or symbolic.
        #[arg(required = true)]
        oids: Vec<String>,
    },
    /// GETNEXT one or more OIDs.
    Getnext {
        #[command(flatten)]
        common: CommonArgs,
        agent: String,
        #[arg(required = true)]
        oids: Vec<String>,
    },
    /// Walk a subtree with GETNEXT.
    Walk {
        #[command(flatten)]
        common: CommonArgs,
        /// Walk sub-options: c, i, p, t, I, E<endoid>.
        #[arg(short = 'C', value_name = "options", action = clap::ArgAction::Append)]
        walk_options: Vec<String>,
        agent: String,
        /// Subtree root (default: mib-2).
        oid: Option<String>,
    },
    /// GETBULK one or more OIDs.
    Bulkget {
        #[command(flatten)]
        common: CommonArgs,
        /// Bulk sub-options: n<num>, r<num>.
        #[arg(short = 'C', value_name = "options", action = clap::ArgAction::Append)]
        bulk_options: Vec<String>,
        agent: String,
        #[arg(required = true)]
        oids: Vec<String>,
    },
    /// Walk a subtree with GETBULK.
    Bulkwalk {
        #[command(flatten)]
        common: CommonArgs,
        /// Walk sub-options: c, i, p, n<num>, r<num>.
        #[arg(short = 'C', value_name = "options", action = clap::ArgAction::Append)]
        walk_options: Vec<String>,
        agent: String,
        oid: Option<String>,
    },
    /// Send an SNMPv2 trap.
    Trap {
        #[command(flatten)]
        common: CommonArgs,
        agent: String,
        /// Uptime in hundredths of a second; empty for system uptime.
        #[arg(allow_hyphen_values = true)]
        uptime: String,
        /// Trap OID.
        trap_oid: String,
        /// Varbinds as OID / type / value triples.
        #[arg(value_name = "oid type value", allow_hyphen_values = true)]
        varbinds: Vec<String>,
    },
    /// List every known MIB object.
    Mibtree {
        /// Output format letters: f, n, S.
        #[arg(short = 'O', value_name = "options", action = clap::ArgAction::Append)]
        output_options: Vec<String>,
    },
}

/// Options common to all network subcommands.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Community string.
    #[arg(short = 'c', value_name = "community", default_value = "public")]
    pub community: String,

    /// Retransmissions after the first attempt.
    #[arg(short = 'r', value_name = "retries", default_value_t = 5)]
    pub retries: u32,

    /// Per-attempt timeout in seconds.
    #[arg(short = 't', value_name = "timeout", default_value_t = 1,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Protocol version: 1 or 2c.
    #[arg(short = 'v', value_name = "version", default_value = "2c",
          value_parser = parse_version)]
    pub version: Version,

    /// Output format letters: a, f, n, q, v, x, S, Q.
    #[arg(short = 'O', value_name = "options", action = clap::ArgAction::Append)]
    pub output_options: Vec<String>,
}

impl CommonArgs {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn parse_version(s: &str) -> std::result::Result<Version, String> {
    match s {
        "1" => Ok(Version::V1),
        "2c" => Ok(Version::V2c),
        _ => Err(format!("unsupported version '{s}' (use 1 or 2c)")),
    }
}

/// How strings render when no DISPLAY-HINT decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringMode {
    /// Printable ASCII as text, anything else as hex.
    #[default]
    Default,
    /// Force text.
    Ascii,
    /// Force hex.
    Hex,
}

/// Decoded `-O` letters.
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub print_equals: bool,
    pub varbind_only: bool,
    pub hint: bool,
    pub oid_format: OidFormat,
    pub string_mode: StringMode,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            print_equals: true,
            varbind_only: false,
            hint: true,
            oid_format: OidFormat::Short,
            string_mode: StringMode::Default,
        }
    }
}

/// Lex `-O` letter groups. `mibtree_only` restricts the set to `f`, `n`,
/// `S` as the mibtree subcommand does.
pub fn parse_output_options(values: &[String], mibtree_only: bool) -> Result<OutputOptions> {
    let mut opts = OutputOptions::default();
    for group in values {
        for letter in group.chars() {
            if mibtree_only && !matches!(letter, 'f' | 'n' | 'S') {
                return Err(Error::argument(format!(
                    "-O{letter} not applicable here (use -O fnS)"
                )));
            }
            match letter {
                'a' => opts.string_mode = StringMode::Ascii,
                'f' => opts.oid_format = OidFormat::Full,
                'n' => opts.oid_format = OidFormat::Numeric,
                'q' => {
                    opts.print_equals = false;
                    opts.hint = false;
                }
                'v' => opts.varbind_only = true,
                'x' => opts.string_mode = StringMode::Hex,
                'S' => opts.oid_format = OidFormat::Short,
                'Q' => opts.hint = false,
                _ => {
                    return Err(Error::argument(format!(
                        "-O{letter}: unknown output option"
                    )));
                }
            }
        }
    }
    Ok(opts)
}

/// Which subcommand a `-C` group belongs to; constrains the letter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CApp {
    Walk,
    Bulkget,
    Bulkwalk,
}

impl CApp {
    fn name(self) -> &'static str {
        match self {
            CApp::Walk => "walk",
            CApp::Bulkget => "bulkget",
            CApp::Bulkwalk => "bulkwalk",
        }
    }

    fn allows(self, letter: char) -> bool {
        match letter {
            'c' | 'i' | 'p' => matches!(self, CApp::Walk | CApp::Bulkwalk),
            'n' | 'r' => matches!(self, CApp::Bulkget | CApp::Bulkwalk),
            't' | 'E' | 'I' => self == CApp::Walk,
            _ => false,
        }
    }
}

/// Decoded `-C` letters.
#[derive(Debug, Clone, Default)]
pub struct COptions {
    pub no_check_increase: bool,
    pub include_start: bool,
    pub print_summary: bool,
    pub print_time: bool,
    pub no_fallback: bool,
    /// End OID literal from `E<endoid>`, resolved by the runner.
    pub end: Option<String>,
    pub non_repeaters: i32,
    pub max_repetitions: i32,
}

impl COptions {
    fn new() -> Self {
        Self {
            max_repetitions: 10,
            ..Default::default()
        }
    }
}

/// Lex `-C` letter groups for the given subcommand.
///
/// `n` and `r` take a decimal number attached to the letter; `E` takes the
/// end OID attached. Negative numbers are rejected outright.
pub fn parse_c_options(values: &[String], app: CApp) -> Result<COptions> {
    let mut opts = COptions::new();

    for group in values {
        let mut chars = group.char_indices();
        while let Some((pos, letter)) = chars.next() {
            if !app.allows(letter) {
                return Err(Error::argument(format!(
                    "-C{letter} not applicable to {}",
                    app.name()
                )));
            }
            match letter {
                'c' => opts.no_check_increase = true,
                'i' => opts.include_start = true,
                'p' => opts.print_summary = true,
                't' => opts.print_time = true,
                'I' => opts.no_fallback = true,
                'E' => {
                    let rest = &group[pos + letter.len_utf8()..];
                    if rest.is_empty() {
                        return Err(Error::argument(
                            "-CE requires an end OID (as in -C E1.3.6.1.2.1.2)".to_string(),
                        ));
                    }
                    opts.end = Some(rest.to_string());
                    break;
                }
                'n' | 'r' => {
                    let rest = &group[pos + letter.len_utf8()..];
                    let digits: String =
                        rest.chars().take_while(|c| c.is_ascii_digit()).collect();
                    if digits.is_empty() {
                        return Err(Error::argument(format!("-C{letter} invalid argument")));
                    }
                    let value: i32 = digits.parse().map_err(|_| {
                        Error::argument(format!("-C{letter}: too large argument"))
                    })?;
                    if letter == 'n' {
                        opts.non_repeaters = value;
                    } else {
                        opts.max_repetitions = value;
                    }
                    // Resume lexing after the digits
                    for _ in 0..digits.len() {
                        chars.next();
                    }
                }
                _ => unreachable!("allows() filters the letter set"),
            }
        }
    }
    Ok(opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn output_defaults() {
        let opts = parse_output_options(&[], false).unwrap();
        assert!(opts.print_equals);
        assert!(opts.hint);
        assert!(!opts.varbind_only);
        assert_eq!(opts.oid_format, OidFormat::Short);
        assert_eq!(opts.string_mode, StringMode::Default);
    }

    #[test]
    fn output_letters() {
        let opts = parse_output_options(&strings(&["nq"]), false).unwrap();
        assert_eq!(opts.oid_format, OidFormat::Numeric);
        assert!(!opts.print_equals);
        assert!(!opts.hint);

        let opts = parse_output_options(&strings(&["a", "f"]), false).unwrap();
        assert_eq!(opts.string_mode, StringMode::Ascii);
        assert_eq!(opts.oid_format, OidFormat::Full);

        let opts = parse_output_options(&strings(&["xvQ"]), false).unwrap();
        assert_eq!(opts.string_mode, StringMode::Hex);
        assert!(opts.varbind_only);
        assert!(!opts.hint);
        assert!(opts.print_equals);
    }

    #[test]
    fn output_rejects_unknown() {
        assert!(parse_output_options(&strings(&["z"]), false).is_err());
    }

    #[test]
    fn output_mibtree_subset() {
        assert!(parse_output_options(&strings(&["fnS"]), true).is_ok());
        assert!(parse_output_options(&strings(&["q"]), true).is_err());
    }

    #[test]
    fn walk_letters() {
        let opts = parse_c_options(&strings(&["cIipt"]), CApp::Walk).unwrap();
        assert!(opts.no_check_increase);
        assert!(opts.no_fallback);
        assert!(opts.include_start);
        assert!(opts.print_summary);
        assert!(opts.print_time);
    }

    #[test]
    fn end_oid_attached() {
        let opts = parse_c_options(&strings(&["E1.3.6.1.2.1.2"]), CApp::Walk).unwrap();
        assert_eq!(opts.end.as_deref(), Some("1.3.6.1.2.1.2"));

        let opts = parse_c_options(&strings(&["ciEsysORTable"]), CApp::Walk).unwrap();
        assert!(opts.no_check_increase);
        assert!(opts.include_start);
        assert_eq!(opts.end.as_deref(), Some("sysORTable"));

        assert!(parse_c_options(&strings(&["E"]), CApp::Walk).is_err());
    }

    #[test]
    fn bulk_numbers() {
        let opts = parse_c_options(&strings(&["n2r25"]), CApp::Bulkwalk).unwrap();
        assert_eq!(opts.non_repeaters, 2);
        assert_eq!(opts.max_repetitions, 25);

        let opts = parse_c_options(&strings(&["n1", "r5"]), CApp::Bulkget).unwrap();
        assert_eq!(opts.non_repeaters, 1);
        assert_eq!(opts.max_repetitions, 5);
    }

    #[test]
    fn bulk_numbers_rejected_at_lexer() {
        assert!(parse_c_options(&strings(&["n"]), CApp::Bulkget).is_err());
        assert!(parse_c_options(&strings(&["n-1"]), CApp::Bulkget).is_err());
        assert!(parse_c_options(&strings(&["r99999999999"]), CApp::Bulkget).is_err());
    }

    #[test]
    fn letters_scoped_per_subcommand() {
        assert!(parse_c_options(&strings(&["t"]), CApp::Bulkwalk).is_err());
        assert!(parse_c_options(&strings(&["E1.3"]), CApp::Bulkwalk).is_err());
        assert!(parse_c_options(&strings(&["c"]), CApp::Bulkget).is_err());
        assert!(parse_c_options(&strings(&["n1"]), CApp::Walk).is_err());
    }

    #[test]
    fn defaults() {
        let opts = parse_c_options(&[], CApp::Bulkwalk).unwrap();
        assert!(!opts.no_check_increase);
        assert_eq!(opts.non_repeaters, 0);
        assert_eq!(opts.max_repetitions, 10);
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "snmp", "get", "-c", "sekrit", "-v", "1", "-r", "2", "-t", "3",
            "localhost", "sysDescr.0",
        ])
        .unwrap();
        match cli.command {
            Command::Get {
                common,
                agent,
                oids,
            } => {
                assert_eq!(common.community, "sekrit");
                assert_eq!(common.version, Version::V1);
                assert_eq!(common.retries, 2);
                assert_eq!(common.timeout, 3);
                assert_eq!(agent, "localhost");
                assert_eq!(oids, vec!["sysDescr.0"]);
            }
            other => panic!("wrong subcommand {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_zero_timeout_and_bad_version() {
        assert!(Cli::try_parse_from(["snmp", "get", "-t", "0", "h", "o"]).is_err());
        assert!(Cli::try_parse_from(["snmp", "get", "-v", "3", "h", "o"]).is_err());
    }

    #[test]
    fn cli_walk_oid_optional() {
        let cli =
            Cli::try_parse_from(["snmp", "walk", "-C", "ip", "127.0.0.1"]).unwrap();
        match cli.command {
            Command::Walk {
                walk_options,
                agent,
                oid,
                ..
            } => {
                assert_eq!(walk_options, vec!["ip"]);
                assert_eq!(agent, "127.0.0.1");
                assert_eq!(oid, None);
            }
            other => panic!("wrong subcommand {other:?}"),
        }
    }

    #[test]
    fn cli_trap_collects_triples() {
        let cli = Cli::try_parse_from([
            "snmp",
            "trap",
            "host",
            "",
            "1.3.6.1.6.3.1.1.5.1",
            "sysName.0",
            "s",
            "router",
        ])
        .unwrap();
        match cli.command {
            Command::Trap {
                uptime,
                trap_oid,
                varbinds,
                ..
            } => {
                assert_eq!(uptime, "");
                assert_eq!(trap_oid, "1.3.6.1.6.3.1.1.5.1");
                assert_eq!(varbinds, vec!["sysName.0", "s", "router"]);
            }
            other => panic!("wrong subcommand {other:?}"),
        }
    }
}
