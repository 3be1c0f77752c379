//! End-to-end coverage of a mounted volume's external behavior, independent
//! of the internal module layout.

use tinyfs::{Error, Volume};

fn disk(dir: &tempfile::TempDir, bytes: u64) -> std::path::PathBuf {
	let path = dir.path().join("test.dsk");
	tinyfs::mkfs(&path, bytes).unwrap();
	path
}

#[test]
fn eight_file_demo_scenario() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();

	let names = ["file1", "file2", "file3", "file4", "file5", "file6", "file7", "file8"];
	let fds: Vec<_> = names.iter().map(|n| volume.open_file(n).unwrap()).collect();

	// descriptors are dense and assigned in open order
	assert_eq!(fds, (0..8).collect::<Vec<_>>());

	let whitepaper = b"A purely peer-to-peer version of electronic cash would allow online payments to be sent directly from one party to another without going through a financial institution.";
	volume.write_file(fds[0], whitepaper).unwrap();

	for &fd in &fds {
		let info = volume.file_info(fd).unwrap();
		assert!(names.contains(&info.name.as_str()));
	}

	let fds_before = fds.clone();
	volume.delete_file(fds[0]).unwrap();
	let reopened = volume.open_file("file1").unwrap();
	assert_eq!(reopened, fds_before[0], "descriptor should be reused after delete+reopen");

	for &fd in &fds[1..] {
		volume.close_file(fd).unwrap();
	}
	volume.close_file(reopened).unwrap();
	volume.unmount().unwrap();

	let mut remounted = Volume::mount(&path).unwrap();
	let mut listing = remounted.readdir().unwrap();
	listing.sort();
	assert_eq!(listing, vec!["file1", "file2", "file3", "file4", "file5", "file6", "file7", "file8"]);
}

#[test]
fn mkfs_size_bound_is_inclusive_at_three_blocks() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("tiny.dsk");
	assert!(tinyfs::mkfs(&path, 3 * tinyfs::BLOCK_SIZE as u64).is_ok());

	let path2 = dir.path().join("toosmall.dsk");
	assert!(matches!(
		tinyfs::mkfs(&path2, 2 * tinyfs::BLOCK_SIZE as u64),
		Err(Error::SizeOutOfRange)
	));
}

#[test]
fn mounting_a_non_tinyfs_file_fails() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("garbage.dsk");
	std::fs::write(&path, vec![0u8; 1024]).unwrap();
	assert!(Volume::mount(&path).is_err());
}

#[test]
fn mounting_a_missing_file_fails() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nope.dsk");
	assert!(matches!(Volume::mount(&path), Err(Error::BackingFileMissing(_))));
}

#[test]
fn nine_character_name_is_rejected_everywhere() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();

	assert!(matches!(volume.open_file("123456789"), Err(Error::NameTooLong(_))));

	let fd = volume.open_file("short").unwrap();
	assert!(matches!(volume.rename(fd, "123456789"), Err(Error::NameTooLong(_))));
}

#[test]
fn eight_character_name_is_accepted() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();
	assert!(volume.open_file("12345678").is_ok());
}

#[test]
fn running_out_of_inode_capacity_is_reported() {
	let dir = tempfile::tempdir().unwrap();
	// 3 blocks total: 1 superblock + 2 usable -> max_files = 1
	let path = disk(&dir, 3 * tinyfs::BLOCK_SIZE as u64);
	let mut volume = Volume::mount(&path).unwrap();
	assert_eq!(volume.max_files(), 1);

	volume.open_file("a").unwrap();
	assert!(matches!(volume.open_file("b"), Err(Error::TooManyOpenFiles)));
}

#[test]
fn full_descriptor_table_does_not_consume_a_block() {
	let dir = tempfile::tempdir().unwrap();
	// 5 blocks total: 1 superblock + 4 usable -> max_files = 2, but only 3
	// of those 4 blocks are reachable from the free list (block 1 is
	// permanently wasted), so the scarce resource here is descriptor slots.
	let path = disk(&dir, 5 * tinyfs::BLOCK_SIZE as u64);
	let mut volume = Volume::mount(&path).unwrap();
	assert_eq!(volume.max_files(), 2);

	let a = volume.open_file("a").unwrap();
	volume.open_file("b").unwrap();
	assert!(matches!(volume.open_file("c"), Err(Error::TooManyOpenFiles)));

	// the rejected create must not have consumed the remaining free block:
	// freeing a descriptor slot should let a third file still be created
	volume.close_file(a).unwrap();
	assert!(volume.open_file("c").is_ok());
}

#[test]
fn write_then_overwrite_with_shorter_data_truncates() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();

	let fd = volume.open_file("a").unwrap();
	volume.write_file(fd, &vec![1u8; 1000]).unwrap();
	volume.write_file(fd, b"hi").unwrap();

	let info = volume.file_info(fd).unwrap();
	assert_eq!(info.size, 2);

	let mut out = Vec::new();
	loop {
		match volume.read_byte(fd) {
			Ok(b) => out.push(b),
			Err(Error::EndOfFile) => break,
			Err(e) => panic!("{e}"),
		}
	}
	assert_eq!(out, b"hi");
}

#[test]
fn seek_past_end_then_read_reports_eof() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();

	let fd = volume.open_file("a").unwrap();
	volume.write_file(fd, b"abc").unwrap();
	volume.seek(fd, 100).unwrap();
	assert!(matches!(volume.read_byte(fd), Err(Error::EndOfFile)));
}

#[test]
fn closing_an_unknown_descriptor_fails() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();
	assert!(matches!(volume.close_file(7), Err(Error::BadDescriptor(7))));
}

#[test]
fn delete_then_reopen_preserves_other_open_files() {
	let dir = tempfile::tempdir().unwrap();
	let path = disk(&dir, 10240);
	let mut volume = Volume::mount(&path).unwrap();

	let a = volume.open_file("a").unwrap();
	let b = volume.open_file("b").unwrap();
	volume.write_file(a, b"aaa").unwrap();
	volume.write_file(b, b"bbb").unwrap();

	volume.delete_file(a).unwrap();

	let mut out = Vec::new();
	loop {
		match volume.read_byte(b) {
			Ok(byte) => out.push(byte),
			Err(Error::EndOfFile) => break,
			Err(e) => panic!("{e}"),
		}
	}
	assert_eq!(out, b"bbb");
}
