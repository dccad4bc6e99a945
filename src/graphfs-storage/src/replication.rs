//! Clone stream codec.
//!
//! A clone stream is a fixed header followed by a CBOR body:
//!
//! ```text
//! offset  size  field
//! 0       8     magic "GRAPHFS\0"
//! 8       4     format version (u32 LE)
//! 12      8     body length in bytes (u64 LE)
//! 20      32    BLAKE3 digest of the body
//! 52      n     CBOR body (StoreImage)
//! ```
//!
//! Decoding validates the header and the body structure completely and
//! produces a staged [`DecodedStore`]; nothing is applied to a live store
//! until the caller swaps it in.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use common_error::{GraphFsError, GraphFsResult};
use graphfs_core::{Edition, Vertex, VertexId, VertexRevisionId};

use crate::capacity::CapacityRecord;
use crate::memory::{VertexRecord, VertexTable};
use crate::mount::AccessMode;

/// Magic bytes opening every clone stream.
pub const STREAM_MAGIC: [u8; 8] = *b"GRAPHFS\0";

/// Current clone stream format version.
pub const STREAM_FORMAT_VERSION: u32 = 1;

/// Length of the fixed stream header.
pub const STREAM_HEADER_LEN: usize = 8 + 4 + 8 + 32;

// ============================================================================
// Body
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct StoreImage<'a> {
    capacity: CapacityRecord,
    access_mode: Option<AccessMode>,
    vertices: Vec<VertexImage<'a>>,
    retired: Vec<VertexId>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VertexImage<'a> {
    id: VertexId,
    editions: Vec<EditionImage<'a>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EditionImage<'a> {
    edition: Edition,
    revisions: Vec<RevisionImage<'a>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RevisionImage<'a> {
    revision: VertexRevisionId,
    vertex: Cow<'a, Vertex>,
}

/// A fully validated store decoded from a clone stream.
#[derive(Debug)]
pub struct DecodedStore {
    /// Vertex content and retired ids.
    pub table: VertexTable,
    /// Byte budget of the source store.
    pub capacity: CapacityRecord,
    /// Access mode of the source store when it was cloned.
    pub access_mode: Option<AccessMode>,
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode a point-in-time table view into a clone stream.
///
/// `used_bytes` in the embedded capacity record is computed from the table
/// itself so it always agrees with the encoded content.
pub fn encode(
    table: &VertexTable,
    total_bytes: u64,
    access_mode: Option<AccessMode>,
) -> GraphFsResult<Bytes> {
    let records = table.sorted();
    let vertices = records
        .iter()
        .map(|(id, record)| VertexImage {
            id: *id,
            editions: record
                .editions()
                .map(|(edition, history)| EditionImage {
                    edition: edition.clone(),
                    revisions: history
                        .iter()
                        .map(|(revision, vertex)| RevisionImage {
                            revision,
                            vertex: Cow::Borrowed(vertex.as_ref()),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let image = StoreImage {
        capacity: CapacityRecord {
            total_bytes,
            used_bytes: table.storage_size(),
        },
        access_mode,
        vertices,
        retired: table.retired_sorted(),
    };

    let mut body = Vec::new();
    ciborium::into_writer(&image, &mut body)
        .map_err(|e| GraphFsError::codec(format!("CBOR encode error: {e}")))?;

    let mut stream = BytesMut::with_capacity(STREAM_HEADER_LEN + body.len());
    stream.put_slice(&STREAM_MAGIC);
    stream.put_u32_le(STREAM_FORMAT_VERSION);
    stream.put_u64_le(body.len() as u64);
    stream.put_slice(blake3::hash(&body).as_bytes());
    stream.put_slice(&body);
    Ok(stream.freeze())
}

// ============================================================================
// Decoding
// ============================================================================

/// Parsed stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamHeader {
    body_len: u64,
    digest: [u8; 32],
}

fn parse_header(mut header: &[u8]) -> GraphFsResult<StreamHeader> {
    if header.len() < STREAM_HEADER_LEN {
        return Err(GraphFsError::format_invalid(format!(
            "stream too short: {} bytes, header needs {STREAM_HEADER_LEN}",
            header.len()
        )));
    }

    let mut magic = [0u8; 8];
    header.copy_to_slice(&mut magic);
    if magic != STREAM_MAGIC {
        return Err(GraphFsError::format_invalid("bad stream magic"));
    }

    let version = header.get_u32_le();
    if version != STREAM_FORMAT_VERSION {
        return Err(GraphFsError::format_invalid(format!(
            "unsupported stream version: expected {STREAM_FORMAT_VERSION}, got {version}"
        )));
    }

    let body_len = header.get_u64_le();
    let mut digest = [0u8; 32];
    header.copy_to_slice(&mut digest);
    Ok(StreamHeader { body_len, digest })
}

/// Validate and decode a clone stream.
///
/// With `verify_checksum` off the body digest is not checked; every other
/// validation still applies.
pub fn decode(stream: &[u8], verify_checksum: bool) -> GraphFsResult<DecodedStore> {
    let header = parse_header(stream)?;
    let body = &stream[STREAM_HEADER_LEN..];
    if body.len() as u64 != header.body_len {
        return Err(GraphFsError::format_invalid(format!(
            "body length mismatch: header says {}, stream has {}",
            header.body_len,
            body.len()
        )));
    }
    if verify_checksum && blake3::hash(body).as_bytes() != &header.digest {
        return Err(GraphFsError::format_invalid("body digest mismatch"));
    }

    let image: StoreImage<'static> = ciborium::from_reader(body)
        .map_err(|e| GraphFsError::format_invalid(format!("CBOR decode error: {e}")))?;
    build_store(image)
}

fn build_store(image: StoreImage<'static>) -> GraphFsResult<DecodedStore> {
    let mut vertices = HashMap::with_capacity(image.vertices.len());
    for vertex_image in image.vertices {
        let id = vertex_image.id;
        if vertex_image.editions.is_empty() {
            return Err(GraphFsError::format_invalid(format!("{id} has no editions")));
        }

        let mut record = VertexRecord::default();
        for edition_image in vertex_image.editions {
            if record.edition(&edition_image.edition).is_some() {
                return Err(GraphFsError::format_invalid(format!(
                    "{id} lists edition {} twice",
                    edition_image.edition
                )));
            }
            if edition_image.revisions.is_empty() {
                return Err(GraphFsError::format_invalid(format!(
                    "{id} edition {} has no revisions",
                    edition_image.edition
                )));
            }

            let history = record.edition_mut(edition_image.edition);
            for revision_image in edition_image.revisions {
                let vertex = revision_image.vertex.into_owned();
                if vertex.id != id {
                    return Err(GraphFsError::format_invalid(format!(
                        "snapshot of {} stored under {id}",
                        vertex.id
                    )));
                }
                if history.contains(revision_image.revision) {
                    return Err(GraphFsError::format_invalid(format!(
                        "{id} repeats revision {}",
                        revision_image.revision
                    )));
                }
                history.push(revision_image.revision, Arc::new(vertex));
            }
        }

        if vertices.insert(id, Arc::new(record)).is_some() {
            return Err(GraphFsError::format_invalid(format!("{id} listed twice")));
        }
    }

    let retired: HashSet<VertexId> = image.retired.into_iter().collect();
    if let Some(id) = retired.iter().find(|id| vertices.contains_key(*id)) {
        return Err(GraphFsError::format_invalid(format!(
            "{id} is both live and retired"
        )));
    }

    let table = VertexTable::from_parts(vertices, retired);
    let used = table.storage_size();
    if used != image.capacity.used_bytes {
        return Err(GraphFsError::format_invalid(format!(
            "capacity record claims {} used bytes, content holds {used}",
            image.capacity.used_bytes
        )));
    }
    if used > image.capacity.total_bytes {
        return Err(GraphFsError::format_invalid(format!(
            "content holds {used} bytes, exceeding the {} byte total",
            image.capacity.total_bytes
        )));
    }

    Ok(DecodedStore {
        table,
        capacity: image.capacity,
        access_mode: image.access_mode,
    })
}

// ============================================================================
// Stream I/O
// ============================================================================

/// Read one complete clone stream from an async reader.
///
/// The header is validated before the body is read, so a reader that is not
/// positioned at a clone stream fails without buffering it.
pub async fn read_stream<R>(reader: &mut R) -> GraphFsResult<Bytes>
where
    R: AsyncRead + Unpin + Send,
{
    let mut header = [0u8; STREAM_HEADER_LEN];
    reader.read_exact(&mut header).await.map_err(|e| {
        GraphFsError::format_invalid(format!("failed to read stream header: {e}"))
    })?;
    let parsed = parse_header(&header)?;

    // The buffer grows with the data actually read, never with the
    // declared length.
    let mut stream = header.to_vec();
    let read = reader
        .take(parsed.body_len)
        .read_to_end(&mut stream)
        .await
        .map_err(|e| GraphFsError::format_invalid(format!("failed to read stream body: {e}")))?;
    if read as u64 != parsed.body_len {
        return Err(GraphFsError::format_invalid(format!(
            "stream body truncated: header declares {} bytes, read {read}",
            parsed.body_len
        )));
    }
    Ok(Bytes::from(stream))
}

/// Write a clone stream to an async writer and flush it.
pub async fn write_stream<W>(writer: &mut W, stream: &[u8]) -> GraphFsResult<()>
where
    W: AsyncWrite + Unpin + Send,
{
    writer.write_all(stream).await?;
    writer.flush().await?;
    Ok(())
}
