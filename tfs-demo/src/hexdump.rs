//! 16-bytes-per-row hex/ASCII dump of a raw backing file, for inspecting a
//! volume's on-disk layout directly.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub fn dump(path: &Path, out: &mut impl io::Write) -> io::Result<()> {
	let mut file = File::open(path)?;
	let mut offset = 0u64;
	let mut buffer = [0u8; 16];

	loop {
		let read = read_up_to(&mut file, &mut buffer)?;
		if read == 0 {
			break;
		}

		write!(out, "{offset:08x}: ")?;
		for i in 0..16 {
			if i < read {
				write!(out, "{:02x} ", buffer[i])?;
			} else {
				write!(out, "   ")?;
			}
			if i == 7 {
				write!(out, " ")?;
			}
		}
		write!(out, " |")?;
		for &byte in &buffer[..read] {
			let ch = if byte.is_ascii_graphic() || byte == b' ' {
				byte as char
			} else {
				'.'
			};
			write!(out, "{ch}")?;
		}
		writeln!(out, "|")?;

		offset += read as u64;
	}
	Ok(())
}

fn read_up_to(file: &mut File, buffer: &mut [u8; 16]) -> io::Result<usize> {
	let mut total = 0;
	while total < buffer.len() {
		match file.read(&mut buffer[total..])? {
			0 => break,
			n => total += n,
		}
	}
	Ok(total)
}
