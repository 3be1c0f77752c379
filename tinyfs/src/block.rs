//! The on-disk codec: pure encode/decode for the four block kinds, plus the
//! thin read/write helpers that compose a decode (or encode) with exactly
//! one [`BlockDevice`] call. These helpers are the only things besides
//! `mkfs` allowed to call into `BlockDevice` directly; the volume manager
//! only ever calls through here.

use crate::disk::{BlockDevice, DiskHandle, BLOCK_SIZE};
use crate::error::{Error, Result};

/// Value stamped at offset 1 of every valid block.
pub const MAGIC: u8 = 0x44;
/// Usable payload bytes in a data block (`BLOCK_SIZE` minus its 6-byte header).
pub const USEABLE_DATA_SIZE: usize = 250;
/// Size, in bytes, of the fixed name slot in an inode (8 usable characters
/// plus the zero byte that doubles as a terminator when the name is shorter).
pub const NAME_SLOT: usize = 9;
/// Longest name that fits in [`NAME_SLOT`] with room to spare for the
/// implicit terminator.
pub const MAX_NAME_LEN: usize = 8;
/// Size, in bytes, of each of the three textual timestamp fields.
pub const TIMESTAMP_SLOT: usize = 25;

const TYPE_SUPER: u8 = 1;
const TYPE_INODE: u8 = 2;
const TYPE_DATA: u8 = 3;
const TYPE_FREE: u8 = 4;

fn encode_name(name: &str) -> Result<[u8; NAME_SLOT]> {
	let bytes = name.as_bytes();
	if bytes.len() > MAX_NAME_LEN {
		return Err(Error::NameTooLong(name.to_string()));
	}
	let mut out = [0u8; NAME_SLOT];
	out[..bytes.len()].copy_from_slice(bytes);
	Ok(out)
}

fn decode_name(raw: &[u8; NAME_SLOT]) -> String {
	let end = raw.iter().position(|&b| b == 0).unwrap_or(NAME_SLOT);
	String::from_utf8_lossy(&raw[..end]).into_owned()
}

fn encode_timestamp(text: &str) -> [u8; TIMESTAMP_SLOT] {
	let bytes = text.as_bytes();
	let mut out = [0u8; TIMESTAMP_SLOT];
	let len = bytes.len().min(TIMESTAMP_SLOT);
	out[..len].copy_from_slice(&bytes[..len]);
	out
}

fn decode_timestamp(raw: &[u8; TIMESTAMP_SLOT]) -> String {
	let end = raw.iter().position(|&b| b == 0).unwrap_or(TIMESTAMP_SLOT);
	String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Returns the current local time formatted the way the inode timestamp
/// fields store it: `YYYY-MM-DD HH:MM:SS`.
pub fn now_timestamp() -> String {
	chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Block 0 of every volume: free-list head, inode-list head, and the
/// volume's file capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
	pub free_head: u32,
	pub inode_head: u32,
	pub max_files: u32,
}

impl SuperBlock {
	pub fn encode(&self) -> [u8; BLOCK_SIZE] {
		let mut buf = [0u8; BLOCK_SIZE];
		buf[0] = TYPE_SUPER;
		buf[1] = MAGIC;
		buf[2..6].copy_from_slice(&self.free_head.to_le_bytes());
		buf[6..10].copy_from_slice(&self.inode_head.to_le_bytes());
		buf[10..14].copy_from_slice(&self.max_files.to_le_bytes());
		buf
	}

	pub fn decode(buf: &[u8; BLOCK_SIZE]) -> Option<Self> {
		if buf[0] != TYPE_SUPER || buf[1] != MAGIC {
			return None;
		}
		Some(Self {
			free_head: u32::from_le_bytes(buf[2..6].try_into().unwrap()),
			inode_head: u32::from_le_bytes(buf[6..10].try_into().unwrap()),
			max_files: u32::from_le_bytes(buf[10..14].try_into().unwrap()),
		})
	}
}

/// A per-file metadata block, chained into the volume's singly-linked
/// inode list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeBlock {
	pub next: u32,
	pub size: u32,
	pub data_head: u32,
	pub name: String,
	pub created: String,
	pub modified: String,
	pub accessed: String,
}

impl InodeBlock {
	pub fn encode(&self) -> Result<[u8; BLOCK_SIZE]> {
		let mut buf = [0u8; BLOCK_SIZE];
		buf[0] = TYPE_INODE;
		buf[1] = MAGIC;
		buf[2..6].copy_from_slice(&self.next.to_le_bytes());
		buf[6..10].copy_from_slice(&self.size.to_le_bytes());
		buf[10..14].copy_from_slice(&self.data_head.to_le_bytes());
		buf[14..23].copy_from_slice(&encode_name(&self.name)?);
		buf[23..48].copy_from_slice(&encode_timestamp(&self.created));
		buf[48..73].copy_from_slice(&encode_timestamp(&self.modified));
		buf[73..98].copy_from_slice(&encode_timestamp(&self.accessed));
		Ok(buf)
	}

	pub fn decode(buf: &[u8; BLOCK_SIZE]) -> Option<Self> {
		if buf[0] != TYPE_INODE || buf[1] != MAGIC {
			return None;
		}
		let name: [u8; NAME_SLOT] = buf[14..23].try_into().unwrap();
		let created: [u8; TIMESTAMP_SLOT] = buf[23..48].try_into().unwrap();
		let modified: [u8; TIMESTAMP_SLOT] = buf[48..73].try_into().unwrap();
		let accessed: [u8; TIMESTAMP_SLOT] = buf[73..98].try_into().unwrap();
		Some(Self {
			next: u32::from_le_bytes(buf[2..6].try_into().unwrap()),
			size: u32::from_le_bytes(buf[6..10].try_into().unwrap()),
			data_head: u32::from_le_bytes(buf[10..14].try_into().unwrap()),
			name: decode_name(&name),
			created: decode_timestamp(&created),
			modified: decode_timestamp(&modified),
			accessed: decode_timestamp(&accessed),
		})
	}
}

/// One link in a file's data-extent chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
	pub next: u32,
	pub payload: [u8; USEABLE_DATA_SIZE],
}

impl DataBlock {
	pub fn encode(next: u32, data: &[u8]) -> [u8; BLOCK_SIZE] {
		debug_assert!(data.len() <= USEABLE_DATA_SIZE);
		let mut buf = [0u8; BLOCK_SIZE];
		buf[0] = TYPE_DATA;
		buf[1] = MAGIC;
		buf[2..6].copy_from_slice(&next.to_le_bytes());
		let len = data.len().min(USEABLE_DATA_SIZE);
		buf[6..6 + len].copy_from_slice(&data[..len]);
		buf
	}

	pub fn decode(buf: &[u8; BLOCK_SIZE]) -> Option<Self> {
		if buf[0] != TYPE_DATA || buf[1] != MAGIC {
			return None;
		}
		let mut payload = [0u8; USEABLE_DATA_SIZE];
		payload.copy_from_slice(&buf[6..6 + USEABLE_DATA_SIZE]);
		Some(Self {
			next: u32::from_le_bytes(buf[2..6].try_into().unwrap()),
			payload,
		})
	}
}

/// One link in the volume's singly-linked free-block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlock {
	pub next: u32,
}

impl FreeBlock {
	pub fn encode(next: u32) -> [u8; BLOCK_SIZE] {
		let mut buf = [0u8; BLOCK_SIZE];
		buf[0] = TYPE_FREE;
		buf[1] = MAGIC;
		buf[2..6].copy_from_slice(&next.to_le_bytes());
		buf
	}

	pub fn decode(buf: &[u8; BLOCK_SIZE]) -> Option<Self> {
		if buf[0] != TYPE_FREE || buf[1] != MAGIC {
			return None;
		}
		Some(Self {
			next: u32::from_le_bytes(buf[2..6].try_into().unwrap()),
		})
	}
}

/// Reads and decodes the superblock (always block 0).
pub fn read_super(dev: &mut BlockDevice, handle: DiskHandle) -> Result<SuperBlock> {
	let mut buf = [0u8; BLOCK_SIZE];
	dev.read_block(handle, 0, &mut buf)?;
	SuperBlock::decode(&buf).ok_or(Error::CorruptBlock(0))
}

/// Encodes and writes the superblock.
pub fn write_super(dev: &mut BlockDevice, handle: DiskHandle, sb: &SuperBlock) -> Result<()> {
	dev.write_block(handle, 0, &sb.encode())
}

/// Reads and decodes the inode at block `idx`.
pub fn read_inode(dev: &mut BlockDevice, handle: DiskHandle, idx: u32) -> Result<InodeBlock> {
	let mut buf = [0u8; BLOCK_SIZE];
	dev.read_block(handle, idx, &mut buf)?;
	InodeBlock::decode(&buf).ok_or(Error::CorruptBlock(idx))
}

/// Encodes and writes an inode at block `idx`.
pub fn write_inode(dev: &mut BlockDevice, handle: DiskHandle, idx: u32, inode: &InodeBlock) -> Result<()> {
	dev.write_block(handle, idx, &inode.encode()?)
}

/// Reads and decodes the data block at block `idx`.
pub fn read_data(dev: &mut BlockDevice, handle: DiskHandle, idx: u32) -> Result<DataBlock> {
	let mut buf = [0u8; BLOCK_SIZE];
	dev.read_block(handle, idx, &mut buf)?;
	DataBlock::decode(&buf).ok_or(Error::CorruptBlock(idx))
}

/// Encodes and writes a data block at block `idx`, with `data` padded out
/// to [`USEABLE_DATA_SIZE`].
pub fn write_data(dev: &mut BlockDevice, handle: DiskHandle, idx: u32, next: u32, data: &[u8]) -> Result<()> {
	dev.write_block(handle, idx, &DataBlock::encode(next, data))
}

/// Reads and decodes the free block at block `idx`.
pub fn read_free(dev: &mut BlockDevice, handle: DiskHandle, idx: u32) -> Result<FreeBlock> {
	let mut buf = [0u8; BLOCK_SIZE];
	dev.read_block(handle, idx, &mut buf)?;
	FreeBlock::decode(&buf).ok_or(Error::CorruptBlock(idx))
}

/// Encodes and writes a free block at block `idx` pointing at `next`.
pub fn write_free(dev: &mut BlockDevice, handle: DiskHandle, idx: u32, next: u32) -> Result<()> {
	dev.write_block(handle, idx, &FreeBlock::encode(next))
}
