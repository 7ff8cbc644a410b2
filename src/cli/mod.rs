//! Subcommand runners.
//!
//! Each runner wires the MIB, transport, session and printer together and
//! writes varbind lines to stdout. Errors bubble up to `main`, which prints
//! them to stderr and exits 1.

pub mod args;
pub mod output;

use crate::client::walk::{Walk, WalkOptions};
use crate::client::{Session, SessionConfig, parse_typed_value};
use crate::error::{Error, Result};
use crate::mib::Mib;
use crate::oid::Oid;
use crate::pdu::Pdu;
use crate::transport::AgentSpec;
use crate::varbind::VarBind;
use crate::version::Version;
use args::{CApp, Cli, Command, CommonArgs, parse_c_options, parse_output_options};
use bytes::Bytes;
use output::Printer;
use std::time::Instant;

/// Default agent port for request operations.
const SNMP_PORT: u16 = 161;
/// Default agent port for traps.
const TRAP_PORT: u16 = 162;

/// The subtree walked when no OID argument is given.
const DEFAULT_WALK_OID: &str = "mib-2";

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Get {
            common,
            agent,
            oids,
        } => run_query(QueryKind::Get, common, agent, oids).await,
        Command::Getnext {
            common,
            agent,
            oids,
        } => run_query(QueryKind::GetNext, common, agent, oids).await,
        Command::Bulkget {
            common,
            bulk_options,
            agent,
            oids,
        } => {
            let c = parse_c_options(&bulk_options, CApp::Bulkget)?;
            run_query(
                QueryKind::GetBulk {
                    non_repeaters: c.non_repeaters,
                    max_repetitions: c.max_repetitions,
                },
                common,
                agent,
                oids,
            )
            .await
        }
        Command::Walk {
            common,
            walk_options,
            agent,
            oid,
        } => run_walk(false, common, walk_options, agent, oid).await,
        Command::Bulkwalk {
            common,
            walk_options,
            agent,
            oid,
        } => run_walk(true, common, walk_options, agent, oid).await,
        Command::Trap {
            common,
            agent,
            uptime,
            trap_oid,
            varbinds,
        } => run_trap(common, agent, uptime, trap_oid, varbinds).await,
        Command::Mibtree { output_options } => run_mibtree(&output_options),
    }
}

enum QueryKind {
    Get,
    GetNext,
    GetBulk {
        non_repeaters: i32,
        max_repetitions: i32,
    },
}

async fn connect_session(
    agent: &str,
    default_port: u16,
    common: &CommonArgs,
) -> Result<Session> {
    let spec = AgentSpec::parse(agent, default_port)?;
    let socket = spec.connect().await?;
    Ok(Session::new(
        socket,
        SessionConfig {
            version: common.version,
            community: Bytes::from(common.community.clone().into_bytes()),
            timeout: common.timeout_duration(),
            retries: common.retries,
        },
    ))
}

/// Map a response error-status to the user's OID literal, the way the
/// error-index points.
fn query_error(pdu: &Pdu, literals: &[String], printer: &Printer<'_>) -> Result<()> {
    if !pdu.is_error() {
        return Ok(());
    }
    let index = usize::try_from(pdu.error_index)
        .ok()
        .and_then(|i| i.checked_sub(1));
    let oid = index
        .and_then(|i| literals.get(i).cloned())
        .or_else(|| pdu.error_oid().map(|oid| printer.render_oid(oid)))
        .unwrap_or_else(|| literals.first().cloned().unwrap_or_default());
    Err(Error::Snmp {
        status: pdu.error_status_enum(),
        oid,
    })
}

async fn run_query(
    kind: QueryKind,
    common: CommonArgs,
    agent: String,
    oid_literals: Vec<String>,
) -> Result<()> {
    if let QueryKind::GetBulk { non_repeaters, .. } = &kind {
        if common.version == Version::V1 {
            return Err(Error::Version);
        }
        if *non_repeaters as usize > oid_literals.len() {
            return Err(Error::argument("need more objects than -Cn<num>"));
        }
    }

    let mib = Mib::standard();
    let printer = Printer::new(&mib, parse_output_options(&common.output_options, false)?);
    let oids: Vec<Oid> = oid_literals
        .iter()
        .map(|s| mib.parse_oid(s))
        .collect::<Result<_>>()?;

    let mut session = connect_session(&agent, SNMP_PORT, &common).await?;
    let pdu = match kind {
        QueryKind::Get => session.get(&oids).await?,
        QueryKind::GetNext => session.getnext(&oids).await?,
        QueryKind::GetBulk {
            non_repeaters,
            max_repetitions,
        } => session.getbulk(&oids, non_repeaters, max_repetitions).await?,
    };

    query_error(&pdu, &oid_literals, &printer)?;
    for vb in &pdu.varbinds {
        println!("{}", printer.render_varbind(vb));
    }
    Ok(())
}

async fn run_walk(
    bulk: bool,
    common: CommonArgs,
    walk_option_groups: Vec<String>,
    agent: String,
    oid: Option<String>,
) -> Result<()> {
    if bulk && common.version == Version::V1 {
        return Err(Error::Version);
    }

    let c = parse_c_options(
        &walk_option_groups,
        if bulk { CApp::Bulkwalk } else { CApp::Walk },
    )?;

    let mib = Mib::standard();
    let printer = Printer::new(&mib, parse_output_options(&common.output_options, false)?);
    let start = mib.parse_oid(oid.as_deref().unwrap_or(DEFAULT_WALK_OID))?;
    let end = c.end.as_deref().map(|e| mib.parse_oid(e)).transpose()?;

    let mut session = connect_session(&agent, SNMP_PORT, &common).await?;

    let started = Instant::now();
    let mut walk = Walk::new(
        &mut session,
        start,
        WalkOptions {
            end,
            check_increase: !c.no_check_increase,
            include_start: c.include_start,
            fallback_on_empty: !c.no_fallback,
            bulk,
            non_repeaters: c.non_repeaters,
            max_repetitions: c.max_repetitions,
        },
    );

    let mut count = 0usize;
    while let Some(result) = walk.next().await {
        let vb = result?;
        println!("{}", printer.render_varbind(&vb));
        count += 1;
    }
    let elapsed = started.elapsed();

    if c.print_summary {
        println!("Variables found: {count}");
    }
    if c.print_time {
        eprintln!(
            "Total traversal time: {}.{:09} seconds",
            elapsed.as_secs(),
            elapsed.subsec_nanos()
        );
    }
    Ok(())
}

async fn run_trap(
    common: CommonArgs,
    agent: String,
    uptime: String,
    trap_oid: String,
    varbind_args: Vec<String>,
) -> Result<()> {
    if common.version == Version::V1 {
        // v1 trap PDUs have a different structure and are not supported
        return Err(Error::argument("trap is not supported for snmp v1"));
    }
    if varbind_args.len() % 3 != 0 {
        return Err(Error::argument(
            "trap varbinds come as oid/type/value triples",
        ));
    }

    let mib = Mib::standard();

    let ticks: u32 = if uptime.is_empty() {
        system_uptime_hundredths()?
    } else {
        uptime
            .parse::<u64>()
            .map_err(|_| Error::argument(format!("Bad value notation ({uptime})")))?
            as u32
    };
    let trap_oid = mib.parse_oid(&trap_oid)?;

    let mut varbinds = Vec::with_capacity(varbind_args.len() / 3);
    for triple in varbind_args.chunks_exact(3) {
        let oid = mib.parse_oid(&triple[0])?;
        let value = parse_typed_value(&triple[0], &triple[1], &triple[2], &mib)?;
        varbinds.push(VarBind::new(oid, value));
    }

    let mut session = connect_session(&agent, TRAP_PORT, &common).await?;
    session.trap_v2(ticks, &trap_oid, varbinds).await
}

fn run_mibtree(output_options: &[String]) -> Result<()> {
    let opts = parse_output_options(output_options, true)?;
    let mib = Mib::standard();
    for (oid, _) in mib.iter() {
        println!("{}", mib.render_oid(&oid, opts.oid_format));
    }
    Ok(())
}

/// System uptime in hundredths of a second, for the empty trap uptime
/// argument.
#[cfg(unix)]
fn system_uptime_hundredths() -> Result<u32> {
    let ts = nix::time::clock_gettime(nix::time::ClockId::CLOCK_MONOTONIC).map_err(|e| {
        Error::Io {
            context: "clock_gettime",
            source: e.into(),
        }
    })?;
    Ok((ts.tv_sec() as u64 * 100 + ts.tv_nsec() as u64 / 10_000_000) as u32)
}

#[cfg(not(unix))]
fn system_uptime_hundredths() -> Result<u32> {
    Err(Error::argument(
        "system uptime unavailable on this platform; pass an explicit uptime",
    ))
}
