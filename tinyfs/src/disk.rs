//! The emulated block device layer.
//!
//! A [`BlockDevice`] is a small registry that maps integer disk handles to
//! backing host files, kept as an explicit value rather than process-wide
//! global state.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Fixed size, in bytes, of every block on every disk this crate manages.
pub const BLOCK_SIZE: usize = 256;

/// Integer handle identifying an open disk. Handles are assigned starting
/// at 1 and are never reused within a process.
pub type DiskHandle = u32;

struct DiskEntry {
	path: PathBuf,
	file: File,
	/// Backing file length in bytes; always a positive multiple of `BLOCK_SIZE`.
	size: u64,
}

/// A registry of open emulated disks, multiplexed by [`DiskHandle`].
///
/// Every operation is synchronous and blocking; nothing here suspends or
/// takes a lock, since the spec's concurrency model is single-threaded.
#[derive(Default)]
pub struct BlockDevice {
	disks: HashMap<DiskHandle, DiskEntry>,
	next_handle: DiskHandle,
}

impl BlockDevice {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			disks: HashMap::new(),
			next_handle: 1,
		}
	}

	/// Opens (or creates) a backing file as a disk.
	///
	/// If `n_bytes == 0`, the file at `path` must already exist and its
	/// length must be a positive multiple of [`BLOCK_SIZE`]; that length is
	/// adopted as the disk size. Otherwise a new file is truncate-created at
	/// `path`, `n_bytes` is rounded down to a block multiple (failing if
	/// that rounds below one block), and the whole file is zero-filled.
	pub fn open(&mut self, path: &Path, n_bytes: u64) -> Result<DiskHandle> {
		let (file, size) = if n_bytes == 0 {
			let mut file = OpenOptions::new()
				.read(true)
				.write(true)
				.open(path)
				.map_err(|_| Error::BackingFileMissing(path.to_path_buf()))?;
			let size = file.seek(SeekFrom::End(0))?;
			if size == 0 || size % BLOCK_SIZE as u64 != 0 {
				return Err(Error::Misaligned);
			}
			(file, size)
		} else {
			let rounded = n_bytes - (n_bytes % BLOCK_SIZE as u64);
			if rounded < BLOCK_SIZE as u64 {
				return Err(Error::SizeOutOfRange);
			}
			let mut file = OpenOptions::new()
				.read(true)
				.write(true)
				.create(true)
				.truncate(true)
				.open(path)?;
			let zeros = vec![0u8; BLOCK_SIZE];
			let mut written = 0u64;
			while written < rounded {
				file.write_all(&zeros)?;
				written += BLOCK_SIZE as u64;
			}
			file.flush()?;
			(file, rounded)
		};

		let handle = self.next_handle;
		self.next_handle += 1;
		log::debug!("opened disk {handle} at {} ({size} bytes)", path.display());
		self.disks.insert(
			handle,
			DiskEntry {
				path: path.to_path_buf(),
				file,
				size,
			},
		);
		Ok(handle)
	}

	/// Closes the backing file for `handle` and removes it from the registry.
	pub fn close(&mut self, handle: DiskHandle) -> Result<()> {
		self.disks
			.remove(&handle)
			.ok_or(Error::UnknownDisk(handle))?;
		log::debug!("closed disk {handle}");
		Ok(())
	}

	/// Number of [`BLOCK_SIZE`]-sized blocks on `handle`'s disk.
	pub fn block_count(&self, handle: DiskHandle) -> Result<u32> {
		let entry = self.entry(handle)?;
		Ok((entry.size / BLOCK_SIZE as u64) as u32)
	}

	/// Path the disk was opened from.
	pub fn path(&self, handle: DiskHandle) -> Result<&Path> {
		Ok(self.entry(handle)?.path.as_path())
	}

	/// Reads exactly one block into `out`.
	pub fn read_block(&mut self, handle: DiskHandle, block_index: u32, out: &mut [u8; BLOCK_SIZE]) -> Result<()> {
		let total = self.block_count(handle)?;
		if block_index >= total {
			return Err(Error::BlockOutOfRange {
				index: block_index,
				total,
			});
		}
		let entry = self.entry_mut(handle)?;
		entry.file.seek(SeekFrom::Start(block_index as u64 * BLOCK_SIZE as u64))?;
		entry.file.read_exact(out)?;
		Ok(())
	}

	/// Writes exactly one block from `data`.
	pub fn write_block(&mut self, handle: DiskHandle, block_index: u32, data: &[u8; BLOCK_SIZE]) -> Result<()> {
		let total = self.block_count(handle)?;
		if block_index >= total {
			return Err(Error::BlockOutOfRange {
				index: block_index,
				total,
			});
		}
		let entry = self.entry_mut(handle)?;
		entry.file.seek(SeekFrom::Start(block_index as u64 * BLOCK_SIZE as u64))?;
		entry.file.write_all(data)?;
		Ok(())
	}

	fn entry(&self, handle: DiskHandle) -> Result<&DiskEntry> {
		self.disks.get(&handle).ok_or(Error::UnknownDisk(handle))
	}

	fn entry_mut(&mut self, handle: DiskHandle) -> Result<&mut DiskEntry> {
		self.disks.get_mut(&handle).ok_or(Error::UnknownDisk(handle))
	}
}
