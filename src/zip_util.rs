use crate::error::{Error, Result};
use std::io::prelude::*;
use std::io::Cursor;
use zip::read::ZipArchive;

pub type PseudoFile = Cursor<Vec<u8>>;

/// Pull the obstacle .DAT member out of a DOF distribution archive.
/// The member name changes every cycle, so match on extension, not name.
pub fn dat_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<PseudoFile> {
    let mut dat_name = None;
    for i in 0..archive.len() {
        let name = archive.by_index(i)?.name().to_string();
        if name.to_uppercase().ends_with(".DAT") {
            dat_name = Some(name);
            break;
        }
    }

    let name = dat_name.ok_or(Error::NoDatFile)?;
    let mut dat = archive.by_name(&name)?;
    let mut tmp = Cursor::new(Vec::with_capacity(dat.size() as usize));
    dat.read_to_end(tmp.get_mut())?;
    Ok(tmp)
}
