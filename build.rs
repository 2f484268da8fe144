use entities::ENTITIES;
use std::io::{self, BufWriter, Write};
use std::{env, fs::File, path::PathBuf};

fn main() -> io::Result<()> {
    let out_dir: PathBuf = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Fence contents are decoded with the named references that end in ";"
    // only; the bare legacy forms ("&amp" without a semicolon) never appear
    // in converter output we care about. Store just the inner name, sorted,
    // so entity::lookup can binary search it.
    let mut named = ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
        .map(|e| (&e.entity[1..e.entity.len() - 1], e.characters))
        .collect::<Vec<_>>();
    named.sort_by_key(|(name, _)| *name);
    named.dedup_by_key(|(name, _)| *name);

    let longest = named.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut bw = BufWriter::new(File::create(out_dir.join("entitydata.rs"))?);
    writeln!(bw, "mod entitydata {{")?;
    writeln!(bw, "    pub const MAX_NAME_LENGTH: usize = {};", longest)?;
    writeln!(
        bw,
        "    pub static NAMED_ENTITIES: &[(&str, &str); {}] = &[",
        named.len()
    )?;
    for (name, characters) in named {
        writeln!(bw, "        ({:?}, {:?}),", name, characters)?;
    }
    writeln!(bw, "    ];")?;
    writeln!(bw, "}}")?;
    bw.flush()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
