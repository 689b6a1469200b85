use std::fs::File;
use std::io::{self, Write};

use env_logger::{Builder, Env, Target};

use crate::cli::CommonArgs;
use crate::errors::Result;

/// Installs the global logger at the level picked by the verbosity flags.
/// `RUST_LOG` still takes precedence. With `--logfile` every record also goes
/// to that file.
pub fn init_logging(common: &CommonArgs) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(common.log_level()));
    if let Some(path) = &common.logfile {
        let file = File::create(path)?;
        builder.target(Target::Pipe(Box::new(Tee::new(io::stderr(), file))));
    }
    builder.try_init()?;
    Ok(())
}

/// Writer duplicating everything into two sinks.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
