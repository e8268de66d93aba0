//! Line-oriented command interpreter over a [`Registry`].

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use ramfs_core::{FsConfig, FsError, OpenOptions, RamFs, Registry};

pub const HELP: &str = "\
COMMANDS:
    mkdir PATH             Create a directory
    touch PATH             Create an empty file if missing
    write PATH TEXT...     Replace a file's contents
    append PATH TEXT...    Append to a file (created if missing)
    cat PATH               Print a file
    ls [PATH]              List a directory (default /)
    mv [-f] SRC DST        Move, -f replaces an existing target
    cp [-f] SRC DST        Copy, -f replaces an existing target
    rm PATH                Delete a file or empty directory
    stat PATH              Show kind and size
    hash PATH              BLAKE3 digest of a file
    ro on|off              Toggle read-only mode
    ns                     List namespaces (* marks the current one)
    use NAME               Switch namespace, registering it if new
    help                   Show this help";

/// Interpreter state: the registry and the namespace commands run against.
pub struct Session {
    registry: Registry,
    current: Arc<RamFs>,
}

impl Session {
    /// Start a session on `namespace`, registering it if the registry does
    /// not have it yet.
    pub fn new(registry: Registry, namespace: &str) -> Result<Self> {
        let current = lookup_or_register(&registry, namespace)?;
        Ok(Self { registry, current })
    }

    pub fn namespace(&self) -> &str {
        self.current.name()
    }

    /// Run one command line and return its output (possibly empty).
    pub fn execute(&mut self, line: &str) -> Result<String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = words.split_first() else {
            return Ok(String::new());
        };
        let fs = Arc::clone(&self.current);

        match (cmd, args) {
            ("mkdir", [path]) => {
                fs.create_directory(*path)?;
                Ok(String::new())
            }
            ("touch", [path]) => {
                fs.open_channel(*path, OpenOptions::write().with_create())?;
                Ok(String::new())
            }
            ("write", [path, text @ ..]) => {
                fs.write_all(*path, text.join(" ").as_bytes())?;
                Ok(String::new())
            }
            ("append", [path, text @ ..]) => {
                let mut channel = fs.open_channel(*path, OpenOptions::append())?;
                channel.write(text.join(" ").as_bytes())?;
                Ok(String::new())
            }
            ("cat", [path]) => {
                let body = fs.read_all(*path)?;
                Ok(String::from_utf8_lossy(&body).into_owned())
            }
            ("ls", []) => list(&fs, "/"),
            ("ls", [path]) => list(&fs, path),
            ("mv", ["-f", src, dst]) => Ok(fs.rename(*src, *dst, true).map(|_| String::new())?),
            ("mv", [src, dst]) => Ok(fs.rename(*src, *dst, false).map(|_| String::new())?),
            ("cp", ["-f", src, dst]) => Ok(fs.copy(*src, *dst, true).map(|_| String::new())?),
            ("cp", [src, dst]) => Ok(fs.copy(*src, *dst, false).map(|_| String::new())?),
            ("rm", [path]) => {
                fs.delete(*path)?;
                Ok(String::new())
            }
            ("stat", [path]) => {
                let attr = fs.stat(*path)?;
                Ok(format!("{} {} bytes", attr.kind, attr.size))
            }
            ("hash", [path]) => Ok(fs.digest(*path)?.to_hex()),
            ("ro", ["on"]) => {
                fs.set_read_only(true)?;
                Ok(String::new())
            }
            ("ro", ["off"]) => {
                fs.set_read_only(false)?;
                Ok(String::new())
            }
            ("ns", []) => Ok(self
                .registry
                .names()
                .into_iter()
                .map(|name| {
                    let marker = if name == self.namespace() { "*" } else { " " };
                    format!("{marker} {name}")
                })
                .collect::<Vec<_>>()
                .join("\n")),
            ("use", [name]) => {
                self.current = lookup_or_register(&self.registry, name)?;
                Ok(String::new())
            }
            ("help", []) => Ok(HELP.to_string()),
            _ => bail!("invalid command: {line} (try `help`)"),
        }
    }
}

fn lookup_or_register(registry: &Registry, namespace: &str) -> Result<Arc<RamFs>> {
    match registry.lookup(namespace) {
        Ok(fs) => Ok(fs),
        Err(FsError::NotFound(_)) => registry
            .register(namespace, FsConfig::default())
            .with_context(|| format!("registering namespace {namespace}")),
        Err(e) => Err(e.into()),
    }
}

fn list(fs: &RamFs, path: &str) -> Result<String> {
    let entries = fs.list(path)?;
    Ok(entries
        .map(|entry| {
            if entry.kind.is_dir() {
                format!("{}/", entry.name)
            } else {
                entry.name
            }
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
