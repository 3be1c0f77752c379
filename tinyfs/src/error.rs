//! The error taxonomy for every `tinyfs` operation.
//!
//! A typed `Error` enum, one variant per failure mode, so callers can match
//! on what went wrong instead of memorizing return codes.

use std::io;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while creating, mounting, or operating on
/// a TinyFS volume.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Propagated from the underlying backing-file I/O.
	#[error("i/o error: {0}")]
	Io(#[from] io::Error),

	/// `BlockDevice::open`/`close` referenced a handle nothing has registered.
	#[error("no disk is registered under handle {0}")]
	UnknownDisk(u32),

	/// A read or write addressed a block index outside the disk's extent.
	#[error("block index {index} is out of range (disk has {total} blocks)")]
	BlockOutOfRange { index: u32, total: u32 },

	/// The backing file's length is not a positive multiple of the block size.
	#[error("backing file size is not a positive multiple of the block size")]
	Misaligned,

	/// `mkfs` was asked for a size outside `[3 * BLOCK_SIZE, MAX_BYTES]`.
	#[error("requested filesystem size is out of range")]
	SizeOutOfRange,

	/// The block/inode layout math left room for zero files.
	#[error("volume is too small to hold any inodes")]
	NoInodeCapacity,

	/// `mount` couldn't open the backing file at all.
	#[error("backing file {0} could not be opened")]
	BackingFileMissing(PathBuf),

	/// A block's type tag or magic byte failed validation during mount.
	#[error("block {0} has an invalid type tag or magic byte")]
	CorruptBlock(u32),

	/// The inode list or a data-extent chain refers to a block that isn't
	/// what it claims to be.
	#[error("inode or data chain is inconsistent")]
	ChainCorrupt,

	/// `open_file` found the name already referenced by a live descriptor.
	#[error("file `{0}` is already open")]
	AlreadyOpen(String),

	/// A descriptor index is out of range or its slot is empty.
	#[error("descriptor {0} does not refer to an open file")]
	BadDescriptor(usize),

	/// The descriptor table has no empty slot left.
	#[error("descriptor table is full")]
	TooManyOpenFiles,

	/// The free list was empty when a block allocation was attempted.
	#[error("no free blocks left on volume")]
	NoSpace,

	/// `read_byte` was called with the file pointer at or past the file size.
	#[error("read past end of file")]
	EndOfFile,

	/// A name is longer than the 8 usable bytes the 9-byte inode slot allows.
	#[error("file name `{0}` is too long (8 characters max)")]
	NameTooLong(String),
}
