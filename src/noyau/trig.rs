// src/noyau/trig.rs
//
// Trig spéciale (angles “exactement reconnus”) pour sin/cos/tan et leurs inverses
// -------------------------------------------------------------------------------
// - En degrés / grades, un argument exact (entier, décimal, réel dyadique) est un
//   multiple rationnel de π : coeff = x / 180 (deg) ou x / 200 (grad)
// - Réduction modulo période (sin/cos: 2 ; tan: 1)
// - Table angles spéciaux sur n ∈ {1,2,3,4,6} : valeur ±√r/d exacte, ou indéfini
//
// sin(30°) = 1/2 exactement, cos(90°) = 0, tan(90°) indéfini.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use super::decimal::Decimal;
use super::erreurs::Resultat;
use super::modes::{Angle, Regime};
use super::nombres::Valeur;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

impl TrigFn {
    pub fn depuis_nom(nom: &str) -> Option<Self> {
        match nom {
            "sin" => Some(TrigFn::Sin),
            "cos" => Some(TrigFn::Cos),
            "tan" => Some(TrigFn::Tan),
            _ => None,
        }
    }

    /// Fonction dont `nom` est l'inverse multiplicatif (sec = 1/cos, …).
    pub fn reciproque(nom: &str) -> Option<Self> {
        match nom {
            "sec" => Some(TrigFn::Cos),
            "csc" => Some(TrigFn::Sin),
            "cot" => Some(TrigFn::Tan),
            _ => None,
        }
    }
}

/// signe · √racine / diviseur
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exacte {
    pub signe: i8,
    pub racine: u32,
    pub diviseur: u32,
}

impl Exacte {
    const fn new(signe: i8, racine: u32, diviseur: u32) -> Self {
        Self {
            signe,
            racine,
            diviseur,
        }
    }

    /// Valeur dans la représentation du régime (décimal exact à la précision courante).
    pub fn valeur(&self, regime: Regime, precision: u32) -> Resultat<Valeur> {
        if self.signe == 0 {
            return Ok(Valeur::Entier(BigInt::zero()));
        }
        if regime == Regime::Decimal {
            let mut d = Decimal::depuis_entier(&BigInt::from(self.racine), precision);
            if self.racine != 1 {
                d = d.racine()?;
            }
            d = d.div(&Decimal::depuis_entier(&BigInt::from(self.diviseur), precision))?;
            if self.signe < 0 {
                d = d.neg();
            }
            return Ok(Valeur::Decimal(d));
        }
        let x = f64::from(self.racine).sqrt() / f64::from(self.diviseur);
        Ok(Valeur::Reel(if self.signe < 0 { -x } else { x }))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TrigOutcome {
    Valeur(Exacte, String),
    Indefini(String),
}

/// Reconnaît les angles spéciaux (argument exprimé dans l'unité `angle`).
///
/// Retour:
/// - Some(Valeur(exacte, preuve)) si reconnu
/// - Some(Indefini(preuve)) si indéfini (tan(90°), tan(270°))
/// - None si non reconnu (radians, argument non exact, angle quelconque)
pub fn trig_special(x: &Valeur, angle: Angle, f: TrigFn) -> Option<TrigOutcome> {
    // 1) argument exact -> coeff·π
    let demi_tour = match angle {
        Angle::Rad => return None,
        Angle::Deg => 180,
        Angle::Grad => 200,
    };
    let coeff = rationnel_exact(x)? / BigRational::from_integer(BigInt::from(demi_tour));

    // 2) réduire modulo période
    let coeff_reduit = match f {
        TrigFn::Sin | TrigFn::Cos => mod_rationnel(&coeff, 2),
        TrigFn::Tan => mod_rationnel(&coeff, 1),
    };

    // 3) convertir en k/n "petit"
    let (k, n) = rational_to_small_kn(&coeff_reduit)?;

    // 4) k mod (2n) (tables sin/cos/tan codées sur [0,2π))
    let k_mod = k.rem_euclid(2 * n);

    const ZERO: Exacte = Exacte::new(0, 1, 1);
    const UN: Exacte = Exacte::new(1, 1, 1);
    const MOINS_UN: Exacte = Exacte::new(-1, 1, 1);
    const DEMI: Exacte = Exacte::new(1, 1, 2);
    const MOINS_DEMI: Exacte = Exacte::new(-1, 1, 2);
    const RAC2_2: Exacte = Exacte::new(1, 2, 2);
    const MOINS_RAC2_2: Exacte = Exacte::new(-1, 2, 2);
    const RAC3_2: Exacte = Exacte::new(1, 3, 2);
    const MOINS_RAC3_2: Exacte = Exacte::new(-1, 3, 2);
    const RAC3_3: Exacte = Exacte::new(1, 3, 3);
    const MOINS_RAC3_3: Exacte = Exacte::new(-1, 3, 3);
    const RAC3: Exacte = Exacte::new(1, 3, 1);
    const MOINS_RAC3: Exacte = Exacte::new(-1, 3, 1);

    let a = (k_mod, n);
    let (valeur, texte) = match f {
        TrigFn::Sin => match a {
            (0, _) | (1, 1) | (2, 1) => (ZERO, "0"),
            (1, 6) | (5, 6) => (DEMI, "1/2"),
            (7, 6) | (11, 6) => (MOINS_DEMI, "-1/2"),
            (1, 4) | (3, 4) => (RAC2_2, "√2/2"),
            (5, 4) | (7, 4) => (MOINS_RAC2_2, "-√2/2"),
            (1, 3) | (2, 3) => (RAC3_2, "√3/2"),
            (4, 3) | (5, 3) => (MOINS_RAC3_2, "-√3/2"),
            (1, 2) => (UN, "1"),
            (3, 2) => (MOINS_UN, "-1"),
            _ => return None,
        },

        TrigFn::Cos => match a {
            (0, _) | (2, 1) => (UN, "1"),
            (1, 1) => (MOINS_UN, "-1"),
            (1, 6) | (11, 6) => (RAC3_2, "√3/2"),
            (5, 6) | (7, 6) => (MOINS_RAC3_2, "-√3/2"),
            (1, 4) | (7, 4) => (RAC2_2, "√2/2"),
            (3, 4) | (5, 4) => (MOINS_RAC2_2, "-√2/2"),
            (1, 3) | (5, 3) => (DEMI, "1/2"),
            (2, 3) | (4, 3) => (MOINS_DEMI, "-1/2"),
            (1, 2) | (3, 2) => (ZERO, "0"),
            _ => return None,
        },

        TrigFn::Tan => match a {
            (0, _) | (1, 1) | (2, 1) => (ZERO, "0"),
            (1, 6) | (7, 6) => (RAC3_3, "√3/3"),
            (5, 6) | (11, 6) => (MOINS_RAC3_3, "-√3/3"),
            (1, 4) | (5, 4) => (UN, "1"),
            (3, 4) | (7, 4) => (MOINS_UN, "-1"),
            (1, 3) | (4, 3) => (RAC3, "√3"),
            (2, 3) | (5, 3) => (MOINS_RAC3, "-√3"),
            (1, 2) | (3, 2) => {
                return Some(TrigOutcome::Indefini(format!(
                    "tan({}) = indéfini",
                    format_angle_kn_pi(k_mod, n)
                )))
            }
            _ => return None,
        },
    };

    let nom = match f {
        TrigFn::Sin => "sin",
        TrigFn::Cos => "cos",
        TrigFn::Tan => "tan",
    };
    Some(TrigOutcome::Valeur(
        valeur,
        format!("{nom}({}) = {texte}", format_angle_kn_pi(k_mod, n)),
    ))
}

/* ------------------------ Outils ------------------------ */

/// Valeur rationnelle exacte de l'argument (None pour un complexe / non fini).
fn rationnel_exact(x: &Valeur) -> Option<BigRational> {
    match x {
        Valeur::Entier(n) => Some(BigRational::from_integer(n.clone())),
        Valeur::Decimal(d) => Some(d.vers_rationnel()),
        Valeur::Reel(x) => BigRational::from_float(*x),
        Valeur::Complexe(_) => None,
    }
}

/// coeff mod periode, dans [0, periode).
fn mod_rationnel(coeff: &BigRational, periode: i64) -> BigRational {
    let p = BigRational::from_integer(BigInt::from(periode));
    let r = coeff % &p;
    if r.is_negative() {
        r + p
    } else {
        r
    }
}

fn format_angle_kn_pi(k: i64, n: i64) -> String {
    if k == 0 {
        return "0".to_string();
    }
    if n == 1 {
        return match k {
            1 => "π".to_string(),
            _ => format!("{k}π"),
        };
    }
    if k == 1 {
        return format!("π/{n}");
    }
    format!("{k}π/{n}")
}

/// Convertit un rationnel (déjà réduit par num-rational) en (k,n) i64.
/// Accepte seulement n ∈ {1,2,3,4,6}.
fn rational_to_small_kn(r: &BigRational) -> Option<(i64, i64)> {
    let n = r.denom().to_i64()?;
    let k = r.numer().to_i64()?;

    if [1, 2, 3, 4, 6].contains(&n) {
        Some((k, n))
    } else {
        None
    }
}
