// src/noyau/modes.rs
//
// Modes scientifiques (état de session)
// -------------------------------------
// - unité d'angle       : rad | deg | grad
// - régime de précision : ieee754 | bigint | decimal
// - complexes           : off | on | auto
// - précision           : 1..=1000 décimales (régime decimal)
// - arrondi             : nearest | up | down | towardZero
//
// Passé explicitement (&Modes) au lexeur et à l'évaluateur : jamais copié dans les jetons.

use num_bigint::BigInt;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::complexe;
use super::decimal::Decimal;
use super::erreurs::{ErreurCalcul, Resultat};
use super::nombres::{Ieee754, Valeur};

pub const PRECISION_MIN: u32 = 1;
pub const PRECISION_MAX: u32 = 1000;
pub const PRECISION_DEFAUT: u32 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Angle {
    #[default]
    Rad,
    Deg,
    Grad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Regime {
    #[default]
    Ieee754,
    BigInt,
    Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PolitiqueComplexe {
    #[default]
    Off,
    On,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Arrondi {
    #[default]
    Proche,
    Haut,
    Bas,
    VersZero,
}

/// Noms acceptés / affichés pour chaque énumération.
macro_rules! noms_mode {
    ($t:ty, $quoi:literal, $($var:ident => $nom:literal),+ $(,)?) => {
        impl FromStr for $t {
            type Err = ErreurCalcul;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($nom => Ok(Self::$var),)+
                    autre => Err(ErreurCalcul::Mode(format!(
                        "{} inconnu: '{}' (attendu: {})",
                        $quoi,
                        autre,
                        [$($nom),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let nom = match self {
                    $(Self::$var => $nom,)+
                };
                write!(f, "{nom}")
            }
        }
    };
}

noms_mode!(Angle, "mode d'angle", Rad => "rad", Deg => "deg", Grad => "grad");
noms_mode!(Regime, "régime de précision", Ieee754 => "ieee754", BigInt => "bigint", Decimal => "decimal");
noms_mode!(PolitiqueComplexe, "mode complexe", Off => "off", On => "on", Auto => "auto");
noms_mode!(Arrondi, "mode d'arrondi", Proche => "nearest", Haut => "up", Bas => "down", VersZero => "towardZero");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Modes {
    angle: Angle,
    regime: Regime,
    complexe: PolitiqueComplexe,
    precision: u32,
    arrondi: Arrondi,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            angle: Angle::Rad,
            regime: Regime::Ieee754,
            complexe: PolitiqueComplexe::Off,
            precision: PRECISION_DEFAUT,
            arrondi: Arrondi::Proche,
        }
    }
}

impl fmt::Display for Modes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "angle={} régime={} complexe={} précision={} arrondi={}",
            self.angle, self.regime, self.complexe, self.precision, self.arrondi
        )
    }
}

impl Modes {
    pub fn new() -> Self {
        Self::default()
    }

    /* ------------------------ Accès ------------------------ */

    pub fn angle(&self) -> Angle {
        self.angle
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn complexe(&self) -> PolitiqueComplexe {
        self.complexe
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn arrondi(&self) -> Arrondi {
        self.arrondi
    }

    /* ------------------------ Setters validés ------------------------ */

    pub fn set_angle_mode(&mut self, s: &str) -> Resultat<()> {
        self.angle = s.parse()?;
        Ok(())
    }

    pub fn set_precision_mode(&mut self, s: &str) -> Resultat<()> {
        self.regime = s.parse()?;
        Ok(())
    }

    pub fn set_complex_mode(&mut self, s: &str) -> Resultat<()> {
        self.complexe = s.parse()?;
        Ok(())
    }

    pub fn set_rounding_mode(&mut self, s: &str) -> Resultat<()> {
        self.arrondi = s.parse()?;
        Ok(())
    }

    pub fn set_precision(&mut self, digits: u32) -> Resultat<()> {
        if !(PRECISION_MIN..=PRECISION_MAX).contains(&digits) {
            return Err(ErreurCalcul::Mode(format!(
                "précision hors bornes: {digits} (attendu {PRECISION_MIN}..={PRECISION_MAX})"
            )));
        }
        self.precision = digits;
        Ok(())
    }

    /// Retour aux valeurs documentées (rad, ieee754, off, 50, nearest).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /* ------------------------ Angles ------------------------ */

    pub fn to_radians(&self, x: f64) -> f64 {
        match self.angle {
            Angle::Rad => x,
            Angle::Deg => x * PI / 180.0,
            Angle::Grad => x * PI / 200.0,
        }
    }

    pub fn from_radians(&self, x: f64) -> f64 {
        match self.angle {
            Angle::Rad => x,
            Angle::Deg => x * 180.0 / PI,
            Angle::Grad => x * 200.0 / PI,
        }
    }

    /// Arrondi à l'entier selon la politique.
    pub fn round(&self, x: f64) -> f64 {
        match self.arrondi {
            Arrondi::Proche => x.round(),
            Arrondi::Haut => x.ceil(),
            Arrondi::Bas => x.floor(),
            Arrondi::VersZero => x.trunc(),
        }
    }

    /* ------------------------ Littéraux + normalisation ------------------------ */

    /// Littéral numérique -> valeur du régime courant.
    pub fn lire_litteral(&self, texte: &str) -> Resultat<Valeur> {
        let invalide = || ErreurCalcul::invalide(format!("littéral invalide: '{texte}'"));
        match self.regime {
            Regime::Ieee754 => texte.parse::<f64>().map(Valeur::Reel).map_err(|_| invalide()),
            Regime::BigInt => {
                let entier = texte
                    .strip_prefix('-')
                    .unwrap_or(texte)
                    .bytes()
                    .all(|c| c.is_ascii_digit());
                if entier {
                    BigInt::parse_bytes(texte.as_bytes(), 10)
                        .map(Valeur::Entier)
                        .ok_or_else(invalide)
                } else {
                    texte.parse::<f64>().map(Valeur::Reel).map_err(|_| invalide())
                }
            }
            Regime::Decimal => Decimal::parse(texte, self.precision)
                .map(Valeur::Decimal)
                .ok_or_else(invalide),
        }
    }

    /// Normalise un résultat d'opérateur / de fonction selon le régime et la politique complexe.
    pub fn normaliser(&self, v: Valeur) -> Resultat<Valeur> {
        let v = match v {
            Valeur::Complexe(z) => {
                let z = complexe::nettoyer(z);
                match self.complexe {
                    PolitiqueComplexe::Off => {
                        if !complexe::est_reel(&z) {
                            return Err(ErreurCalcul::invalide(
                                "résultat complexe (mode complexe désactivé)",
                            ));
                        }
                        Valeur::Reel(z.re)
                    }
                    PolitiqueComplexe::Auto if complexe::est_reel(&z) => Valeur::Reel(z.re),
                    _ => {
                        if self.regime == Regime::Ieee754 {
                            return Ok(Valeur::Complexe(Ieee754::valider_complexe(&z)?));
                        }
                        return Ok(Valeur::Complexe(z));
                    }
                }
            }
            autre => autre,
        };

        match (self.regime, v) {
            (Regime::Ieee754, Valeur::Reel(x)) => Ok(Valeur::Reel(Ieee754::valider(x)?)),
            (Regime::Ieee754, Valeur::Entier(n)) => {
                Ok(Valeur::Reel(Ieee754::valider(Valeur::Entier(n).vers_f64()?)?))
            }
            (Regime::Ieee754, Valeur::Decimal(d)) => Ok(Valeur::Reel(Ieee754::valider(d.vers_f64())?)),

            (Regime::BigInt, Valeur::Reel(x)) => {
                let x = Ieee754::valider(x)?;
                match Valeur::Reel(x).vers_entier() {
                    Some(n) => Ok(Valeur::Entier(n)),
                    None => Ok(Valeur::Reel(x)),
                }
            }
            (Regime::BigInt, Valeur::Decimal(d)) => {
                if d.est_entier() {
                    Ok(Valeur::Entier(d.vers_entier()))
                } else {
                    Ok(Valeur::Reel(Ieee754::valider(d.vers_f64())?))
                }
            }

            (Regime::Decimal, Valeur::Reel(x)) => {
                // sous-normal représentable en décimal : seule la garde non fini s'applique
                let x = if x.is_finite() { x } else { Ieee754::valider(x)? };
                let d = Valeur::Reel(x).vers_decimal(self.precision)?;
                Ok(Valeur::Decimal(d.arrondir(self.precision, self.arrondi)))
            }
            (Regime::Decimal, Valeur::Entier(n)) => {
                Ok(Valeur::Decimal(Decimal::depuis_entier(&n, self.precision)))
            }
            (Regime::Decimal, Valeur::Decimal(d)) => {
                Ok(Valeur::Decimal(d.arrondir(self.precision, self.arrondi)))
            }

            (_, autre) => Ok(autre),
        }
    }
}
