//! Parsing of command-line triangulations and enumeration options.

use anyhow::{anyhow, bail, Context, Result};
use normalsurf::prelude::*;

/// Resolve a triangulation from a catalog name, an isomorphism signature or
/// a dehydration string, tried in that order.
pub fn load_triangulation(sig: &str) -> Result<Triangulation> {
    if let Some(tri) = catalog::by_name(sig)? {
        return Ok(tri);
    }
    match Triangulation::from_iso_sig(sig) {
        Ok(tri) => Ok(tri),
        Err(sig_err) => Triangulation::rehydrate(sig).with_context(|| {
            format!("{sig:?} is neither a catalog name nor an isomorphism signature ({sig_err})")
        }),
    }
}

pub fn parse_coords(name: &str) -> Result<NormalCoords> {
    NormalCoords::from_short_name(name).ok_or_else(|| anyhow!("unknown coordinate system {name:?}"))
}

/// `vertex` or `fundamental`, embedded unless `immersed`.
pub fn parse_which(name: &str, immersed: bool) -> Result<NormalList> {
    let kind = match name.to_ascii_lowercase().as_str() {
        "vertex" => NormalList::VERTEX,
        "fundamental" | "hilbert" => NormalList::FUNDAMENTAL,
        other => bail!("unknown list type {other:?}; expected vertex or fundamental"),
    };
    let scope = if immersed { NormalList::IMMERSED_SINGULAR } else { NormalList::EMBEDDED_ONLY };
    Ok(kind | scope)
}

/// Comma-separated algorithm hints, e.g. `dd,std-direct`. Empty means
/// defaults.
pub fn parse_alg(hints: Option<&str>) -> Result<NormalAlg> {
    let mut alg = NormalAlg::empty();
    let Some(hints) = hints else {
        return Ok(alg);
    };
    for part in hints.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        alg |= match part.to_ascii_lowercase().as_str() {
            "tree" => NormalAlg::VERTEX_TREE,
            "dd" => NormalAlg::VERTEX_DD,
            "via-reduced" => NormalAlg::VERTEX_VIA_REDUCED,
            "std-direct" => NormalAlg::VERTEX_STD_DIRECT,
            "primal" => NormalAlg::HILBERT_PRIMAL,
            "dual" => NormalAlg::HILBERT_DUAL,
            "cd" => NormalAlg::HILBERT_CD,
            "fullcone" => NormalAlg::HILBERT_FULLCONE,
            other => bail!("unknown algorithm hint {other:?}"),
        };
    }
    Ok(alg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangulations_resolve_by_name_and_signature() {
        assert_eq!(load_triangulation("fig8").unwrap().size(), 2);
        assert_eq!(load_triangulation("cPcbbbiht").unwrap(), catalog::figure_eight());
        assert_eq!(load_triangulation("loop5").unwrap().size(), 5);
        assert_eq!(load_triangulation("sfs-rp2").unwrap().size(), 9);
        assert_eq!(load_triangulation("cabbbbteh").unwrap().size(), 2);
        assert!(load_triangulation("!!").is_err());
    }

    #[test]
    fn options_parse() {
        assert_eq!(parse_coords("AN").unwrap(), NormalCoords::AlmostNormal);
        assert!(parse_coords("spun").is_err());
        assert_eq!(
            parse_which("fundamental", true).unwrap(),
            NormalList::FUNDAMENTAL | NormalList::IMMERSED_SINGULAR
        );
        assert!(parse_which("edges", false).is_err());
        assert_eq!(
            parse_alg(Some("dd, std-direct")).unwrap(),
            NormalAlg::VERTEX_DD | NormalAlg::VERTEX_STD_DIRECT
        );
        assert_eq!(parse_alg(None).unwrap(), NormalAlg::empty());
        assert!(parse_alg(Some("simplex")).is_err());
    }
}
