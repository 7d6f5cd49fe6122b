//! The afterburner (`FGDM`) compressed envelope.
//!
//! The envelope is a sequence of varint-framed sections: `Fver` (format
//! version), `Fcdr` (compression catalog, skipped), `ABMP` (the zlib-wrapped
//! resource table) and `FGEI` (the initial load segment, whose resources are
//! eagerly decompressed into the raw cache). Everything outside the initial
//! load segment is inflated on demand by `Movie::chunk_by_id`.

use rifx_stream::FourCC;
use tracing::{debug, error, trace, warn};

use crate::directory::ChunkInfo;
use crate::error::{Error, Result};
use crate::movie::Movie;
use crate::tags;

/// Resource id of the initial load segment descriptor.
const ILS_ID: u32 = 2;

impl Movie {
    pub(crate) fn read_afterburner_map(&mut self) -> Result<()> {
        self.expect_marker(tags::FVER)?;
        let fver_len = self.stream.read_varint()?;
        let fver_start = self.stream.pos();
        let fver_version = self.stream.read_varint()?;
        trace!("Fver: version {fver_version:#x}");
        let consumed = self.stream.pos() - fver_start;
        if consumed as u32 != fver_len {
            warn!("Fver: declared {fver_len} bytes but read {consumed}, resynchronizing");
            self.stream.seek(fver_start + fver_len as usize);
        }

        self.expect_marker(tags::FCDR)?;
        let fcdr_len = self.stream.read_varint()?;
        self.stream.skip(fcdr_len as usize)?;

        self.expect_marker(tags::ABMP)?;
        let abmp_len = self.stream.read_varint()?;
        let abmp_end = self.stream.pos() + abmp_len as usize;
        let abmp_compression = self.stream.read_varint()?;
        let abmp_uncompressed_len = self.stream.read_varint()?;
        debug!(
            "ABMP: length {abmp_len}, compression type {abmp_compression}, \
             uncompressed length {abmp_uncompressed_len}"
        );

        let compressed_len = abmp_end.saturating_sub(self.stream.pos());
        let mut abmp = self
            .stream
            .read_zlib(compressed_len, abmp_uncompressed_len)
            .map_err(|source| Error::EnvelopeInflate {
                section: tags::ABMP,
                source,
            })?;
        if abmp.len() != abmp_uncompressed_len as usize {
            warn!(
                "ABMP: expected uncompressed length {abmp_uncompressed_len} but got {}",
                abmp.len()
            );
        }

        let abmp_unk1 = abmp.read_varint()?;
        let abmp_unk2 = abmp.read_varint()?;
        let resource_count = abmp.read_varint()?;
        trace!("ABMP: unk1 {abmp_unk1}, unk2 {abmp_unk2}, {resource_count} resources");

        for _ in 0..resource_count {
            let id = abmp.read_varint()?;
            let offset = abmp.read_varint()? as i32;
            let stored_len = abmp.read_varint()?;
            let uncompressed_len = abmp.read_varint()?;
            let compression = abmp.read_varint()?;
            let tag = abmp.read_tag()?;
            trace!(
                "resource {id}: '{tag}', {stored_len} bytes ({uncompressed_len} uncompressed) \
                 at offset {offset}, compression type {compression}"
            );
            self.directory.insert(ChunkInfo {
                id,
                tag,
                stored_len,
                uncompressed_len,
                offset,
                compression,
            });
        }

        let ils = self
            .directory
            .get(ILS_ID)
            .copied()
            .ok_or_else(|| {
                error!("resource table has no entry for the initial load segment");
                Error::MissingRequired("FGEI initial load segment")
            })?;
        self.expect_marker(tags::FGEI)?;
        let ils_unk1 = self.stream.read_varint()?;
        trace!("ILS: length {}, unk1 {ils_unk1}", ils.stored_len);

        self.ils_body_offset = self.stream.pos();
        let mut ils_stream = self
            .stream
            .read_zlib(ils.stored_len as usize, ils.uncompressed_len)
            .map_err(|source| Error::EnvelopeInflate {
                section: tags::FGEI,
                source,
            })?;
        if ils_stream.len() != ils.uncompressed_len as usize {
            warn!(
                "ILS: expected uncompressed length {} but got {}",
                ils.uncompressed_len,
                ils_stream.len()
            );
        }

        while !ils_stream.eof() {
            let id = ils_stream.read_varint()?;
            let info = self
                .directory
                .get(id)
                .copied()
                .ok_or(Error::UnknownChunk(id))?;
            trace!(
                "loading initial resource {id}: '{}', {} bytes",
                info.tag, info.stored_len
            );
            match ils_stream.copy_bytes(info.stored_len as usize) {
                Ok(data) => {
                    self.raw_cache.insert(id, data);
                }
                Err(err) => {
                    warn!("could not load initial resource {id}: {err}");
                    break;
                }
            }
        }

        debug!(
            "afterburner map: {} resources, {} pre-loaded",
            self.directory.len(),
            self.raw_cache.len()
        );
        Ok(())
    }

    fn expect_marker(&mut self, expected: FourCC) -> Result<()> {
        let found = self.stream.read_tag()?;
        if found != expected {
            return Err(Error::MalformedEnvelope { expected, found });
        }
        Ok(())
    }
}
