//! A command-line driver around the `tinyfs` library: format volumes,
//! inspect them, and exercise the file operations from a shell. This binary
//! is a thin collaborator around the library, not part of the filesystem
//! itself.

mod hexdump;
mod info;

use std::env;
use std::path::PathBuf;
use std::process::exit;

use tinyfs::Volume;

/// Structure storing command line arguments.
#[derive(Default)]
struct Args {
	/// The name of the current program used in command line.
	prog: String,
	/// The subcommand requested (`mkfs`, `ls`, `cat`, `write`, `rm`, `mv`,
	/// `info`, `hexdump`).
	command: String,
	/// Positional arguments following the subcommand.
	rest: Vec<String>,
}

fn parse_args() -> Args {
	let mut args: Args = Default::default();
	let mut iter = env::args();

	args.prog = iter.next().unwrap_or_else(|| "tfs-demo".to_owned());
	args.command = iter.next().unwrap_or_default();
	args.rest = iter.collect();

	args
}

fn usage(prog: &str) {
	eprintln!("usage: {prog} <command> [args...]");
	eprintln!();
	eprintln!("commands:");
	eprintln!("  mkfs <disk> <bytes>           format a new volume");
	eprintln!("  ls <disk>                     list files");
	eprintln!("  cat <disk> <name>             print a file's contents");
	eprintln!("  write <disk> <name> <text>    replace a file's contents");
	eprintln!("  rm <disk> <name>              delete a file");
	eprintln!("  mv <disk> <old> <new>         rename a file");
	eprintln!("  info <disk> <name>            show file metadata");
	eprintln!("  hexdump <disk>                dump the raw backing file");
}

fn fail(prog: &str, err: impl std::fmt::Display) -> ! {
	eprintln!("{prog}: {err}");
	exit(1);
}

fn main() {
	env_logger::init();
	let args = parse_args();

	match args.command.as_str() {
		"mkfs" => cmd_mkfs(&args),
		"ls" => cmd_ls(&args),
		"cat" => cmd_cat(&args),
		"write" => cmd_write(&args),
		"rm" => cmd_rm(&args),
		"mv" => cmd_mv(&args),
		"info" => cmd_info(&args),
		"hexdump" => cmd_hexdump(&args),
		"" | "-h" | "--help" => {
			usage(&args.prog);
			exit(if args.command.is_empty() { 1 } else { 0 });
		}
		other => {
			eprintln!("{}: unknown command `{other}`", args.prog);
			usage(&args.prog);
			exit(1);
		}
	}
}

fn disk_path(args: &Args, index: usize) -> PathBuf {
	args.rest
		.get(index)
		.unwrap_or_else(|| fail(&args.prog, "missing disk path"))
		.into()
}

fn mount(args: &Args, index: usize) -> (Volume, PathBuf) {
	let path = disk_path(args, index);
	let volume = Volume::mount(&path).unwrap_or_else(|e| fail(&args.prog, e));
	(volume, path)
}

fn cmd_mkfs(args: &Args) {
	let path = disk_path(args, 0);
	let bytes: u64 = args
		.rest
		.get(1)
		.map(|s| s.parse().unwrap_or_else(|_| fail(&args.prog, "size must be a byte count")))
		.unwrap_or(tinyfs::DEFAULT_DISK_SIZE);

	tinyfs::mkfs(&path, bytes).unwrap_or_else(|e| fail(&args.prog, e));
	println!("formatted {} ({bytes} bytes)", path.display());
}

fn cmd_ls(args: &Args) {
	let (mut volume, _) = mount(args, 0);
	let mut names = volume.readdir().unwrap_or_else(|e| fail(&args.prog, e));
	names.sort();
	for name in names {
		println!("{name}");
	}
}

fn cmd_cat(args: &Args) {
	let (mut volume, _) = mount(args, 0);
	let name = args
		.rest
		.get(1)
		.unwrap_or_else(|| fail(&args.prog, "missing file name"));

	let fd = volume.open_file(name).unwrap_or_else(|e| fail(&args.prog, e));
	let mut out = Vec::new();
	loop {
		match volume.read_byte(fd) {
			Ok(byte) => out.push(byte),
			Err(tinyfs::Error::EndOfFile) => break,
			Err(e) => fail(&args.prog, e),
		}
	}
	volume.close_file(fd).unwrap_or_else(|e| fail(&args.prog, e));

	use std::io::Write;
	std::io::stdout().write_all(&out).unwrap_or_else(|e| fail(&args.prog, e));
}

fn cmd_write(args: &Args) {
	let (mut volume, _) = mount(args, 0);
	let name = args
		.rest
		.get(1)
		.unwrap_or_else(|| fail(&args.prog, "missing file name"));
	let text = args
		.rest
		.get(2)
		.unwrap_or_else(|| fail(&args.prog, "missing file contents"));

	let fd = volume.open_file(name).unwrap_or_else(|e| fail(&args.prog, e));
	volume.write_file(fd, text.as_bytes()).unwrap_or_else(|e| fail(&args.prog, e));
	volume.close_file(fd).unwrap_or_else(|e| fail(&args.prog, e));
}

fn cmd_rm(args: &Args) {
	let (mut volume, _) = mount(args, 0);
	let name = args
		.rest
		.get(1)
		.unwrap_or_else(|| fail(&args.prog, "missing file name"));

	let fd = volume.open_file(name).unwrap_or_else(|e| fail(&args.prog, e));
	volume.delete_file(fd).unwrap_or_else(|e| fail(&args.prog, e));
}

fn cmd_mv(args: &Args) {
	let (mut volume, _) = mount(args, 0);
	let old = args
		.rest
		.get(1)
		.unwrap_or_else(|| fail(&args.prog, "missing current file name"));
	let new = args
		.rest
		.get(2)
		.unwrap_or_else(|| fail(&args.prog, "missing new file name"));

	let fd = volume.open_file(old).unwrap_or_else(|e| fail(&args.prog, e));
	volume.rename(fd, new).unwrap_or_else(|e| fail(&args.prog, e));
	volume.close_file(fd).unwrap_or_else(|e| fail(&args.prog, e));
}

fn cmd_info(args: &Args) {
	let (mut volume, _) = mount(args, 0);
	let name = args
		.rest
		.get(1)
		.unwrap_or_else(|| fail(&args.prog, "missing file name"));

	let fd = volume.open_file(name).unwrap_or_else(|e| fail(&args.prog, e));
	let file_info = volume.file_info(fd).unwrap_or_else(|e| fail(&args.prog, e));
	info::print(fd, &file_info);
	volume.close_file(fd).unwrap_or_else(|e| fail(&args.prog, e));
}

fn cmd_hexdump(args: &Args) {
	let path = disk_path(args, 0);
	let stdout = std::io::stdout();
	let mut lock = stdout.lock();
	hexdump::dump(&path, &mut lock).unwrap_or_else(|e| fail(&args.prog, e));
}
