//! Human-readable [`FileInfo`] presentation.

use tinyfs::FileInfo;

pub fn print(fd: tinyfs::Fd, info: &FileInfo) {
	println!("fd {fd}: {}", info.name);
	println!("  size:     {} bytes", info.size);
	println!("  created:  {}", info.created);
	println!("  modified: {}", info.modified);
	println!("  accessed: {}", info.accessed);
}
