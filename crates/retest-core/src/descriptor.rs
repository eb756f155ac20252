//! Descriptor normalization: raw call-graph node renderings to call edges
//!
//! The call-graph engine renders each node as a hyphen-delimited list of
//! frames. The first frame is the node itself, every further frame is a
//! method it invokes:
//!
//! ```text
//! Node: < Application, Lnet/mooctest/CMD, run()V > Context: Everywhere
//!  - invokevirtual < Application, Lnet/mooctest/Util, parse()V >@4
//!  - invokespecial < Primordial, Ljava/lang/Object, <init>()V >@9
//! ```
//!
//! Every frame holds a `< Loader, ClassDescriptor, selector >` reference.

use std::collections::BTreeSet;

use crate::error::{Result, RetestError};
use crate::model::{Loader, MethodRef};

/// Separator between frames of one descriptor.
pub const FRAME_SEPARATOR: char = '-';

const REF_OPEN: &str = "< ";
const REF_CLOSE: &str = " >";
const FIELD_SEPARATOR: &str = ", ";

/// One resolved frame of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub loader: Loader,
    pub method: MethodRef,
}

/// A call edge between two application methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallEdge {
    pub callee: MethodRef,
    pub caller: MethodRef,
}

/// Counters collected while normalizing descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub descriptors: usize,
    pub malformed: usize,
    /// Descriptors left with fewer than two application frames.
    pub isolated: usize,
    pub edges: usize,
}

/// Deduplicated edge set plus the counters that produced it.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub edges: BTreeSet<CallEdge>,
    pub stats: NormalizeStats,
}

/// Parse the first method reference in a frame token.
pub fn parse_frame(token: &str) -> Result<Frame> {
    let start = token
        .find(REF_OPEN)
        .ok_or_else(|| RetestError::malformed("missing method reference", token))?;
    let body = &token[start + REF_OPEN.len()..];
    let end = body
        .find(REF_CLOSE)
        .ok_or_else(|| RetestError::malformed("unterminated method reference", token))?;

    let mut fields = body[..end].splitn(3, FIELD_SEPARATOR);
    let (Some(loader), Some(class), Some(selector)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(RetestError::malformed("expected loader, class and selector", token));
    };
    if class.is_empty() || selector.is_empty() {
        return Err(RetestError::malformed("empty class or selector", token));
    }

    Ok(Frame {
        loader: loader.parse()?,
        method: MethodRef::new(class, selector),
    })
}

/// Parse every non-blank frame of one descriptor.
pub fn parse_descriptor(descriptor: &str) -> Result<Vec<Frame>> {
    descriptor
        .split(FRAME_SEPARATOR)
        .filter(|token| !token.trim().is_empty())
        .map(parse_frame)
        .collect()
}

/// Normalize raw descriptors into a deduplicated set of application call edges.
///
/// Platform frames are dropped before the caller is chosen. Malformed
/// descriptors are skipped and counted; they never abort normalization.
pub fn normalize<I, S>(descriptors: I) -> Normalized
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Normalized::default();

    for descriptor in descriptors {
        let descriptor = descriptor.as_ref();
        out.stats.descriptors += 1;

        let frames = match parse_descriptor(descriptor) {
            Ok(frames) => frames,
            Err(e) => {
                tracing::warn!("Skipping descriptor: {}", e);
                out.stats.malformed += 1;
                continue;
            }
        };

        let mut application = frames
            .into_iter()
            .filter(|frame| !frame.loader.is_platform())
            .map(|frame| frame.method);

        let Some(caller) = application.next() else {
            out.stats.isolated += 1;
            continue;
        };
        let mut emitted = false;
        for callee in application {
            emitted = true;
            out.edges.insert(CallEdge {
                callee,
                caller: caller.clone(),
            });
        }
        if !emitted {
            out.stats.isolated += 1;
        }
    }

    out.stats.edges = out.edges.len();
    tracing::debug!(
        "Normalized {} descriptors into {} edges ({} malformed, {} isolated)",
        out.stats.descriptors,
        out.stats.edges,
        out.stats.malformed,
        out.stats.isolated
    );
    out
}
