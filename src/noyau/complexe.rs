// src/noyau/complexe.rs
//
// Complexes (re, im) en f64
// -------------------------
// + − × viennent de num-complex ; ÷ et inverse sont gardés (dénominateur nul = erreur).
// exp/ln directs, sin/cos/tan par les identités en e^{iz}.

use num_complex::Complex64;

use super::erreurs::{ErreurCalcul, Resultat};

pub type Complexe = Complex64;

pub const I: Complexe = Complex64::new(0.0, 1.0);

/// Vrai si la partie imaginaire est négligeable (|im| < ε machine).
pub fn est_reel(z: &Complexe) -> bool {
    z.im.abs() < f64::EPSILON
}

pub fn vers_reel(z: &Complexe) -> Resultat<f64> {
    if est_reel(z) {
        Ok(z.re)
    } else {
        Err(ErreurCalcul::invalide(format!(
            "{} n'est pas réel",
            super::format::format_complexe(z)
        )))
    }
}

pub fn est_nul(z: &Complexe) -> bool {
    z.re == 0.0 && z.im == 0.0
}

pub fn diviser(a: &Complexe, b: &Complexe) -> Resultat<Complexe> {
    if est_nul(b) {
        return Err(ErreurCalcul::DivisionParZero(format!(
            "{} / 0",
            super::format::format_complexe(a)
        )));
    }
    let d = b.re * b.re + b.im * b.im;
    Ok(Complexe::new(
        (a.re * b.re + a.im * b.im) / d,
        (a.im * b.re - a.re * b.im) / d,
    ))
}

pub fn inverse(z: &Complexe) -> Resultat<Complexe> {
    diviser(&Complexe::new(1.0, 0.0), z)
}

pub fn exp(z: &Complexe) -> Complexe {
    let m = z.re.exp();
    Complexe::new(m * z.im.cos(), m * z.im.sin())
}

/// Branche principale : ln|z| + i·arg(z).
pub fn ln(z: &Complexe) -> Resultat<Complexe> {
    if est_nul(z) {
        return Err(ErreurCalcul::invalide("ln(0)"));
    }
    Ok(Complexe::new(z.norm().ln(), z.im.atan2(z.re)))
}

/// sin z = (e^{iz} − e^{−iz}) / 2i
pub fn sin(z: &Complexe) -> Complexe {
    let iz = I * z;
    (exp(&iz) - exp(&-iz)) / (I * 2.0)
}

/// cos z = (e^{iz} + e^{−iz}) / 2
pub fn cos(z: &Complexe) -> Complexe {
    let iz = I * z;
    (exp(&iz) + exp(&-iz)) / 2.0
}

pub fn tan(z: &Complexe) -> Resultat<Complexe> {
    diviser(&sin(z), &cos(z))
}

/// Racine principale : √((|z| + a)/2) + i·sgn(b)·√((|z| − a)/2), exacte sur l'axe réel.
pub fn racine(z: &Complexe) -> Complexe {
    if est_nul(z) {
        return Complexe::new(0.0, 0.0);
    }
    let m = z.norm();
    let re = ((m + z.re) / 2.0).sqrt();
    let im = ((m - z.re) / 2.0).sqrt();
    Complexe::new(re, if z.im < 0.0 { -im } else { im })
}

/// Annule une partie négligeable devant le module (résidus de cos(π/2), …).
pub fn nettoyer(z: Complexe) -> Complexe {
    let seuil = f64::EPSILON * z.norm();
    Complexe::new(
        if z.re.abs() < seuil { 0.0 } else { z.re },
        if z.im.abs() < seuil { 0.0 } else { z.im },
    )
}

/// a^b = e^{b·ln a} ; 0^b = 0 pour Re(b) > 0.
pub fn puissance(a: &Complexe, b: &Complexe) -> Resultat<Complexe> {
    if est_nul(a) {
        if est_nul(b) {
            return Ok(Complexe::new(1.0, 0.0));
        }
        if b.re > 0.0 {
            return Ok(Complexe::new(0.0, 0.0));
        }
        return Err(ErreurCalcul::DivisionParZero("0 ^ exposant non positif".into()));
    }
    Ok(exp(&(b * ln(a)?)))
}
