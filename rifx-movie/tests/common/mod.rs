//! Shared builders for synthetic movie archives.

#![allow(dead_code)]

use flate2::Compression;
use flate2::write::ZlibEncoder;
use rifx_movie::Endianness;
use std::io::Write as _;

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Endianness-aware byte writer mirroring the reader's conventions: tags are
/// written as endianness-adjusted u32s, varints as little-endian 7-bit
/// groups.
pub struct Writer {
    buf: Vec<u8>,
    endianness: Endianness,
}

impl Writer {
    pub fn new(endianness: Endianness) -> Self {
        Self {
            buf: Vec::new(),
            endianness,
        }
    }

    pub fn pos(&self) -> usize {
        self.buf.len()
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        match self.endianness {
            Endianness::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
            Endianness::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    pub fn put_u32(&mut self, v: u32) {
        match self.endianness {
            Endianness::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
            Endianness::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    pub fn put_i32(&mut self, v: i32) {
        self.put_u32(v as u32);
    }

    pub fn put_tag(&mut self, tag: &[u8; 4]) {
        self.put_u32(u32::from_be_bytes(*tag));
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_varint(&mut self, mut v: u32) {
        loop {
            let byte = (v & 0x7F) as u8;
            v >>= 7;
            if v != 0 {
                self.buf.push(byte | 0x80);
            } else {
                self.buf.push(byte);
                break;
            }
        }
    }

    pub fn put_pascal(&mut self, s: &str) {
        self.buf.push(s.len() as u8);
        self.buf.extend_from_slice(s.as_bytes());
    }

    pub fn patch_u32(&mut self, pos: usize, v: u32) {
        let bytes = match self.endianness {
            Endianness::Big => v.to_be_bytes(),
            Endianness::Little => v.to_le_bytes(),
        };
        self.buf[pos..pos + 4].copy_from_slice(&bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

// Chunk payload builders. The cast family is big-endian on disk no matter
// what the container uses; the key table follows the container.

pub fn key_table_payload(endianness: Endianness, rows: &[(u32, u32, [u8; 4])]) -> Vec<u8> {
    let mut w = Writer::new(endianness);
    w.put_u16(12);
    w.put_u16(12);
    w.put_u32(rows.len() as u32);
    w.put_u32(rows.len() as u32);
    for (section_id, cast_id, tag) in rows {
        w.put_u32(*section_id);
        w.put_u32(*cast_id);
        w.put_tag(tag);
    }
    w.into_bytes()
}

pub fn config_payload(raw_version: u16, min_member: u16) -> Vec<u8> {
    let mut w = Writer::new(Endianness::Big);
    w.put_u16(40); // declared payload length
    w.put_u16(raw_version);
    for v in [0u16, 0, 240, 320] {
        w.put_u16(v); // stage rect
    }
    w.put_u16(min_member);
    w.put_u16(1024);
    while w.pos() < 36 {
        w.put_u8(0);
    }
    w.put_u16(raw_version);
    w.put_u16(0);
    w.into_bytes()
}

pub fn cast_directory_payload(slots: &[u32]) -> Vec<u8> {
    let mut w = Writer::new(Endianness::Big);
    for slot in slots {
        w.put_u32(*slot);
    }
    w.into_bytes()
}

pub fn cast_member_payload(member_type: u32, name: &str, specific: &[u8]) -> Vec<u8> {
    let mut info = Writer::new(Endianness::Big);
    for _ in 0..16 {
        info.put_u16(0);
    }
    info.put_u16(1);
    info.put_u32(0);
    info.put_u32(1 + name.len() as u32);
    info.put_pascal(name);
    let info = info.into_bytes();

    let mut w = Writer::new(Endianness::Big);
    w.put_u32(member_type);
    w.put_u32(info.len() as u32);
    w.put_u32(specific.len() as u32);
    w.put_bytes(&info);
    w.put_bytes(specific);
    w.into_bytes()
}

pub fn cast_list_payload(entries: &[(&str, u32, u16)]) -> Vec<u8> {
    let mut w = Writer::new(Endianness::Big);
    w.put_u32(12); // entry data starts right after the header
    w.put_u16(0);
    w.put_u16(entries.len() as u16);
    w.put_u16(4);
    w.put_u16(0);
    for (name, id, min_member) in entries {
        w.put_pascal(name);
        w.put_pascal("");
        w.put_u16(0); // preload
        w.put_u16(*min_member);
        w.put_u16(min_member + 31);
        w.put_u32(*id);
    }
    w.into_bytes()
}

pub fn script_names_payload(endianness: Endianness, names: &[&str]) -> Vec<u8> {
    let mut w = Writer::new(endianness);
    w.put_i32(0);
    w.put_i32(0);
    w.put_u32(0);
    w.put_u32(0);
    w.put_u16(20); // names start right after the header
    w.put_u16(names.len() as u16);
    for name in names {
        w.put_pascal(name);
    }
    w.into_bytes()
}

/// One content chunk of a memory-map movie. The directory tag and the tag
/// written in the chunk's own framing normally agree; tests for framing
/// validation set them apart.
pub struct SyntheticChunk {
    pub dir_tag: [u8; 4],
    pub body_tag: [u8; 4],
    pub payload: Vec<u8>,
}

/// Builds an `MV93` movie: magic, codec, `imap` at offset 12, `mmap` at
/// offset 32, then the content chunks. Map slots 0..=2 describe the
/// container, `imap` and `mmap` themselves, so content ids start at 3.
pub struct Mv93Builder {
    endianness: Endianness,
    chunks: Vec<SyntheticChunk>,
}

const IMAP_OFFSET: usize = 12;
const IMAP_PAYLOAD_LEN: usize = 12;
const MMAP_OFFSET: usize = IMAP_OFFSET + 8 + IMAP_PAYLOAD_LEN;

impl Mv93Builder {
    pub fn new(endianness: Endianness) -> Self {
        Self {
            endianness,
            chunks: Vec::new(),
        }
    }

    /// Append a content chunk; returns its map id.
    pub fn push(&mut self, tag: &[u8; 4], payload: Vec<u8>) -> u32 {
        self.push_mislabeled(tag, tag, payload)
    }

    /// Append a chunk whose map tag and framing tag disagree.
    pub fn push_mislabeled(
        &mut self,
        dir_tag: &[u8; 4],
        body_tag: &[u8; 4],
        payload: Vec<u8>,
    ) -> u32 {
        self.chunks.push(SyntheticChunk {
            dir_tag: *dir_tag,
            body_tag: *body_tag,
            payload,
        });
        (self.chunks.len() + 2) as u32
    }

    pub fn build(&self) -> Vec<u8> {
        let entry_count = 3 + self.chunks.len();
        let mmap_payload_len = 24 + 20 * entry_count;

        let mut offsets = Vec::with_capacity(self.chunks.len());
        let mut next = MMAP_OFFSET + 8 + mmap_payload_len;
        for chunk in &self.chunks {
            offsets.push(next);
            next += 8 + chunk.payload.len();
        }
        let total_len = next;

        let mut w = Writer::new(self.endianness);
        w.put_tag(b"RIFX");
        w.put_u32((total_len - 8) as u32);
        w.put_tag(b"MV93");

        w.put_tag(b"imap");
        w.put_u32(IMAP_PAYLOAD_LEN as u32);
        w.put_u32(MMAP_OFFSET as u32);
        w.put_u32(0);
        w.put_u32(0);

        w.put_tag(b"mmap");
        w.put_u32(mmap_payload_len as u32);
        w.put_u16(24);
        w.put_u16(20);
        w.put_u32(entry_count as u32);
        w.put_u32(entry_count as u32);
        w.put_i32(-1);
        w.put_i32(-1);
        w.put_i32(-1);

        let mut put_entry = |w: &mut Writer, tag: &[u8; 4], len: usize, offset: usize| {
            w.put_tag(tag);
            w.put_u32(len as u32);
            w.put_u32(offset as u32);
            w.put_u16(0);
            w.put_u16(0);
            w.put_i32(0);
        };
        put_entry(&mut w, b"RIFX", total_len - 8, 0);
        put_entry(&mut w, b"imap", IMAP_PAYLOAD_LEN, IMAP_OFFSET);
        put_entry(&mut w, b"mmap", mmap_payload_len, MMAP_OFFSET);
        for (chunk, offset) in self.chunks.iter().zip(&offsets) {
            put_entry(&mut w, &chunk.dir_tag, chunk.payload.len(), *offset);
        }

        for (chunk, offset) in self.chunks.iter().zip(&offsets) {
            assert_eq!(w.pos(), *offset);
            w.put_tag(&chunk.body_tag);
            w.put_u32(chunk.payload.len() as u32);
            w.put_bytes(&chunk.payload);
        }

        w.into_bytes()
    }
}

/// One resource of an afterburner movie.
pub struct AbResource {
    pub id: u32,
    pub tag: [u8; 4],
    pub payload: Vec<u8>,
    /// Carried uncompressed inside the initial load segment instead of as
    /// an on-demand zlib stream.
    pub in_ils: bool,
    /// Offset applied to the declared uncompressed length in the resource
    /// table.
    pub uncomp_bias: i32,
}

/// Builds an `FGDM` movie: `Fver`/`Fcdr`/`ABMP`/`FGEI`, with the initial
/// load segment first in the `FGEI` body and the on-demand resources packed
/// behind it.
pub struct FgdmBuilder {
    pub endianness: Endianness,
    pub resources: Vec<AbResource>,
    /// Offset applied to the declared uncompressed length of the resource
    /// table itself.
    pub abmp_uncomp_bias: i32,
    /// Leave the initial-load-segment descriptor (id 2) out of the table.
    pub omit_ils_entry: bool,
    /// Tag written where `Fcdr` belongs.
    pub fcdr_tag: [u8; 4],
    /// Replace the resource table's zlib stream with garbage.
    pub corrupt_abmp: bool,
    /// Append a dangling resource id at the end of the initial load segment.
    pub ils_trailing_id: Option<u32>,
}

impl FgdmBuilder {
    pub fn new(endianness: Endianness) -> Self {
        Self {
            endianness,
            resources: Vec::new(),
            abmp_uncomp_bias: 0,
            omit_ils_entry: false,
            fcdr_tag: *b"Fcdr",
            corrupt_abmp: false,
            ils_trailing_id: None,
        }
    }

    pub fn push(&mut self, id: u32, tag: &[u8; 4], payload: Vec<u8>, in_ils: bool) {
        self.resources.push(AbResource {
            id,
            tag: *tag,
            payload,
            in_ils,
            uncomp_bias: 0,
        });
    }

    pub fn build(&self) -> Vec<u8> {
        // Initial load segment body, recording each member's offset.
        let mut ils_plain = Writer::new(self.endianness);
        let mut ils_offsets = Vec::new();
        for resource in self.resources.iter().filter(|r| r.in_ils) {
            ils_plain.put_varint(resource.id);
            ils_offsets.push((resource.id, ils_plain.pos()));
            ils_plain.put_bytes(&resource.payload);
        }
        if let Some(extra) = self.ils_trailing_id {
            ils_plain.put_varint(extra);
        }
        let ils_plain = ils_plain.into_bytes();
        let ils_blob = deflate(&ils_plain);

        // On-demand resources, packed behind the segment.
        let mut rel = ils_blob.len();
        let mut demand_blobs = Vec::new();
        let mut demand_offsets = Vec::new();
        for resource in self.resources.iter().filter(|r| !r.in_ils) {
            let blob = deflate(&resource.payload);
            demand_offsets.push((resource.id, rel, blob.len()));
            rel += blob.len();
            demand_blobs.push(blob);
        }

        // Resource table.
        let mut abmp_plain = Writer::new(self.endianness);
        abmp_plain.put_varint(0);
        abmp_plain.put_varint(0);
        let count = self.resources.len() + usize::from(!self.omit_ils_entry);
        abmp_plain.put_varint(count as u32);
        if !self.omit_ils_entry {
            abmp_plain.put_varint(2);
            abmp_plain.put_varint(0);
            abmp_plain.put_varint(ils_blob.len() as u32);
            abmp_plain.put_varint(ils_plain.len() as u32);
            abmp_plain.put_varint(0);
            abmp_plain.put_tag(b"FGEI");
        }
        for resource in &self.resources {
            let (offset, stored_len, compression) = if resource.in_ils {
                let offset = ils_offsets
                    .iter()
                    .find(|(id, _)| *id == resource.id)
                    .map(|(_, offset)| *offset)
                    .unwrap();
                (offset, resource.payload.len(), 1u32)
            } else {
                let (offset, blob_len) = demand_offsets
                    .iter()
                    .find(|(id, _, _)| *id == resource.id)
                    .map(|(_, offset, blob_len)| (*offset, *blob_len))
                    .unwrap();
                (offset, blob_len, 0u32)
            };
            let uncompressed =
                (resource.payload.len() as i64 + i64::from(resource.uncomp_bias)) as u32;
            abmp_plain.put_varint(resource.id);
            abmp_plain.put_varint(offset as u32);
            abmp_plain.put_varint(stored_len as u32);
            abmp_plain.put_varint(uncompressed);
            abmp_plain.put_varint(compression);
            abmp_plain.put_tag(&resource.tag);
        }
        let abmp_plain = abmp_plain.into_bytes();
        let abmp_blob = if self.corrupt_abmp {
            vec![0xAA; 16]
        } else {
            deflate(&abmp_plain)
        };
        let abmp_declared = (abmp_plain.len() as i64 + i64::from(self.abmp_uncomp_bias)) as u32;

        let mut w = Writer::new(self.endianness);
        w.put_tag(b"RIFX");
        w.put_u32(0); // patched once the total length is known
        w.put_tag(b"FGDM");

        w.put_tag(b"Fver");
        let mut fver = Writer::new(self.endianness);
        fver.put_varint(0x6A3);
        let fver = fver.into_bytes();
        w.put_varint(fver.len() as u32);
        w.put_bytes(&fver);

        w.put_tag(&self.fcdr_tag);
        w.put_varint(2);
        w.put_bytes(&[0, 0]);

        w.put_tag(b"ABMP");
        let mut tail = Writer::new(self.endianness);
        tail.put_varint(0); // table compression type
        tail.put_varint(abmp_declared);
        tail.put_bytes(&abmp_blob);
        let tail = tail.into_bytes();
        w.put_varint(tail.len() as u32);
        w.put_bytes(&tail);

        w.put_tag(b"FGEI");
        w.put_varint(0);
        w.put_bytes(&ils_blob);
        for blob in &demand_blobs {
            w.put_bytes(blob);
        }

        let total = w.pos();
        w.patch_u32(4, (total - 8) as u32);
        w.into_bytes()
    }
}
