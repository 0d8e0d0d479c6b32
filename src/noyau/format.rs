// src/noyau/format.rs
//
// Affichage des valeurs
// ---------------------
// - réels : 15 chiffres significatifs (0.1 + 0.2 s'affiche 0.3), notation e hors [1e-7, 1e21)
// - complexes : a+bi / a-bi
// - décimaux et entiers : écriture exacte

use super::complexe::Complexe;
use super::nombres::Valeur;

/// Chiffres significatifs gardés à l'affichage d'un réel.
const CHIFFRES_AFFICHES: usize = 15;

pub fn format_reel(x: f64) -> String {
    if x.is_nan() {
        return "NaN".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞".into() } else { "-∞".into() };
    }
    if x == 0.0 {
        return "0".into();
    }

    // arrondi d'affichage : repasse par l'écriture scientifique courte
    let arrondi: f64 = format!("{:.*e}", CHIFFRES_AFFICHES - 1, x)
        .parse()
        .unwrap_or(x);

    let a = arrondi.abs();
    if !(1e-7..1e21).contains(&a) {
        return format!("{arrondi:e}");
    }
    format!("{arrondi}")
}

pub fn format_complexe(z: &Complexe) -> String {
    let re = format_reel(z.re);
    if z.im == 0.0 {
        return re;
    }
    let im = format_reel(z.im.abs());
    let im = if im == "1" { String::new() } else { im };
    let signe = if z.im < 0.0 { '-' } else { '+' };
    if z.re == 0.0 {
        let moins = if z.im < 0.0 { "-" } else { "" };
        return format!("{moins}{im}i");
    }
    format!("{re}{signe}{im}i")
}

/// Texte d'une valeur pour l'utilisateur.
pub fn formater(v: &Valeur) -> String {
    match v {
        Valeur::Reel(x) => format_reel(*x),
        Valeur::Complexe(z) => format_complexe(z),
        Valeur::Decimal(d) => d.to_string(),
        Valeur::Entier(n) => n.to_string(),
    }
}
