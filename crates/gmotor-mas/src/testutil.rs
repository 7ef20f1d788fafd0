//! In-memory MAS fixtures for tests.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use zerocopy::little_endian::I32;
use zerocopy::IntoBytes;

use crate::format::{CubeRecord, GmotorRecord, MasVariant, OpaqueRecord};

pub(crate) fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

struct Member {
    name: String,
    entry_type: u8,
    flags: u8,
    size: i32,
    payload: Vec<u8>,
}

/// Builds a container image: signature, header, table, payloads.
pub(crate) struct MasBuilder {
    variant: MasVariant,
    members: Vec<Member>,
    data_size: Option<i32>,
    reverse_payloads: bool,
}

impl MasBuilder {
    pub(crate) fn new(variant: MasVariant) -> Self {
        assert!(variant.signature().is_some(), "{variant} has no signature");
        Self {
            variant,
            members: Vec::new(),
            data_size: None,
            reverse_payloads: false,
        }
    }

    /// Add a member compressed from `content`.
    pub(crate) fn file(self, name: &str, content: &[u8]) -> Self {
        self.raw(name, content.len() as i32, zlib(content))
    }

    /// Add a member with an arbitrary declared size and payload.
    pub(crate) fn raw(mut self, name: &str, size: i32, payload: Vec<u8>) -> Self {
        self.members.push(Member {
            name: name.to_string(),
            entry_type: 0,
            flags: 0,
            size,
            payload,
        });
        self
    }

    /// Set type and flags of the last member (stored by the opaque layout only).
    pub(crate) fn type_and_flags(mut self, entry_type: u8, flags: u8) -> Self {
        let member = self.members.last_mut().unwrap();
        member.entry_type = entry_type;
        member.flags = flags;
        self
    }

    /// Override the header's data size.
    pub(crate) fn data_size(mut self, data_size: i32) -> Self {
        self.data_size = Some(data_size);
        self
    }

    /// Store payloads in reverse table order.
    pub(crate) fn reverse_payloads(mut self) -> Self {
        self.reverse_payloads = true;
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut order: Vec<usize> = (0..self.members.len()).collect();
        if self.reverse_payloads {
            order.reverse();
        }

        let mut offsets = vec![0i32; self.members.len()];
        let mut payloads = Vec::new();
        for &i in &order {
            offsets[i] = payloads.len() as i32;
            payloads.extend_from_slice(&self.members[i].payload);
        }

        let mut out = Vec::new();
        out.extend_from_slice(self.variant.signature().unwrap());
        out.extend(std::iter::repeat(0u8).take(self.variant.header_padding()));
        out.extend_from_slice(&(self.members.len() as i32).to_le_bytes());
        let data_size = self.data_size.unwrap_or(payloads.len() as i32);
        out.extend_from_slice(&data_size.to_le_bytes());

        for (member, &offset) in self.members.iter().zip(&offsets) {
            let offset = I32::new(offset);
            let size = I32::new(member.size);
            let zsize = I32::new(member.payload.len() as i32);
            let name = member.name.as_bytes();

            match self.variant {
                MasVariant::Gmotor => out.extend_from_slice(
                    GmotorRecord {
                        reserved: [0; 4],
                        offset,
                        size,
                        zsize,
                        name: name_field(name),
                    }
                    .as_bytes(),
                ),
                MasVariant::Opaque => out.extend_from_slice(
                    OpaqueRecord {
                        kind: member.entry_type,
                        flags: member.flags,
                        reserved: [0; 2],
                        name: name_field(name),
                        offset,
                        size,
                        zsize,
                        trailer: [0; 4],
                    }
                    .as_bytes(),
                ),
                MasVariant::Cube => out.extend_from_slice(
                    CubeRecord {
                        reserved: [0; 4],
                        offset,
                        size,
                        zsize,
                        gap: [0; 4],
                        name: name_field(name),
                    }
                    .as_bytes(),
                ),
                MasVariant::ShortName => unreachable!(),
            }
        }

        out.extend_from_slice(&payloads);
        out
    }
}

fn name_field<const N: usize>(name: &[u8]) -> [u8; N] {
    let mut field = [0u8; N];
    field[..name.len()].copy_from_slice(name);
    field
}
