//! A small block-structured filesystem that lives entirely inside one host
//! file.
//!
//! Volumes are flat: a single root directory holds every file, addressed
//! only by an 8-character name. Everything above the raw block layer
//! ([`disk`]) goes through the typed codec in [`block`] and is sequenced by
//! [`volume::Volume`], the type most callers want.
//!
//! ```no_run
//! use std::path::Path;
//!
//! tinyfs::mkfs(Path::new("disk.img"), tinyfs::DEFAULT_DISK_SIZE).unwrap();
//! let mut volume = tinyfs::Volume::mount(Path::new("disk.img")).unwrap();
//! let fd = volume.open_file("hello").unwrap();
//! volume.write_file(fd, b"hi").unwrap();
//! ```

pub mod block;
pub mod disk;
pub mod error;
pub mod volume;

pub use disk::{BlockDevice, DiskHandle, BLOCK_SIZE};
pub use error::{Error, Result};
pub use volume::{mkfs, Fd, FileInfo, Volume, DEFAULT_DISK_SIZE, MAX_BYTES};
