//! Subtree enumeration over GETNEXT / GETBULK.
//!
//! The walk cursor advances per emitted varbind and stops on the first of:
//! an exception value, no progress, departure from the start subtree, or
//! reaching the configured end OID. With nothing emitted at all, an
//! optional fallback GET of the start OID runs before the walk finishes.

use super::Session;
use crate::error::{Error, Result};
use crate::oid::{Oid, OidRelation};
use crate::value::Value;
use crate::varbind::VarBind;
use std::collections::VecDeque;

/// Walk behavior knobs, mapped from the `-C` sub-options.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Stop before emitting this OID or anything at or beyond it.
    pub end: Option<Oid>,
    /// Fail with `OID not increasing` on a non-increasing response.
    pub check_increase: bool,
    /// GET the start OID before walking.
    pub include_start: bool,
    /// GET the start OID when the walk emitted nothing.
    pub fallback_on_empty: bool,
    /// Use GETBULK instead of GETNEXT.
    pub bulk: bool,
    pub non_repeaters: i32,
    pub max_repetitions: i32,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            end: None,
            check_increase: true,
            include_start: false,
            fallback_on_empty: true,
            bulk: false,
            non_repeaters: 0,
            max_repetitions: 10,
        }
    }
}

/// An in-progress walk borrowing its session.
pub struct Walk<'a> {
    session: &'a mut Session,
    start: Oid,
    last: Oid,
    options: WalkOptions,
    buffer: VecDeque<VarBind>,
    started: bool,
    done: bool,
    emitted: usize,
}

impl<'a> Walk<'a> {
    /// Begin a walk of the subtree under `start`.
    pub fn new(session: &'a mut Session, start: Oid, options: WalkOptions) -> Self {
        Self {
            session,
            last: start.clone(),
            start,
            options,
            buffer: VecDeque::new(),
            started: false,
            done: false,
            emitted: 0,
        }
    }

    /// Varbinds emitted so far (feeds the `-Cp` summary).
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// The next varbind, or `None` when the walk has finished.
    pub async fn next(&mut self) -> Option<Result<VarBind>> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            if self.options.include_start {
                match self.get_start().await {
                    Ok(vb) => return Some(Ok(vb)),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
        }

        loop {
            if let Some(vb) = self.buffer.pop_front() {
                if vb.value.is_exception() {
                    self.buffer.clear();
                    return self.finish().await;
                }

                match self.last.relation(&vb.oid) {
                    OidRelation::Greater if self.options.check_increase => {
                        self.done = true;
                        return Some(Err(Error::NotIncreasing));
                    }
                    OidRelation::Equal => {
                        self.buffer.clear();
                        return self.finish().await;
                    }
                    _ => {}
                }

                if !matches!(
                    self.start.relation(&vb.oid),
                    OidRelation::AncestorOf { .. }
                ) {
                    self.buffer.clear();
                    return self.finish().await;
                }

                if let Some(end) = &self.options.end
                    && end.relation(&vb.oid) != OidRelation::Greater
                {
                    self.buffer.clear();
                    return self.finish().await;
                }

                self.last = vb.oid.clone();
                self.emitted += 1;
                return Some(Ok(vb));
            }

            // Buffer drained without a stop condition: fetch the next batch
            let response = if self.options.bulk {
                self.session
                    .getbulk(
                        std::slice::from_ref(&self.last),
                        self.options.non_repeaters,
                        self.options.max_repetitions,
                    )
                    .await
            } else {
                self.session.getnext(std::slice::from_ref(&self.last)).await
            };

            let pdu = match response {
                Ok(pdu) => pdu,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            if let Err(e) = super::check_error_status(&pdu, &self.last.to_string()) {
                self.done = true;
                return Some(Err(e));
            }
            if pdu.varbinds.is_empty() {
                return self.finish().await;
            }
            self.buffer = pdu.varbinds.into();
        }
    }

    /// Collect the remaining varbinds.
    pub async fn collect(mut self) -> Result<Vec<VarBind>> {
        let mut out = Vec::new();
        while let Some(result) = self.next().await {
            out.push(result?);
        }
        Ok(out)
    }

    async fn get_start(&mut self) -> Result<VarBind> {
        let pdu = self
            .session
            .get(std::slice::from_ref(&self.start))
            .await?;
        super::check_error_status(&pdu, &self.start.to_string())?;
        let vb = pdu
            .varbinds
            .into_iter()
            .next()
            .unwrap_or_else(|| VarBind::new(self.start.clone(), Value::Null));
        self.emitted += 1;
        Ok(vb)
    }

    async fn finish(&mut self) -> Option<Result<VarBind>> {
        self.done = true;
        if self.options.fallback_on_empty && self.emitted == 0 {
            return Some(self.get_start().await);
        }
        None
    }
}
