// src/noyau/nombres.rs
//
// Valeurs numériques + promotion de type
// --------------------------------------
// Quatre représentations, une seule active à la fois :
// - Reel(f64)         : IEEE-754
// - Complexe(re, im)  : f64 x 2
// - Decimal           : entier scalé exact (decimal.rs)
// - Entier(BigInt)    : entier exact
//
// Promotion (opérateurs binaires) :
//   Complexe si l'un est complexe
//   sinon Decimal (précision max) si l'un est décimal
//   sinon Entier si les deux sont entiers
//   sinon Reel

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

use super::complexe::{self, Complexe};
use super::decimal::{div_floor, Decimal, BITS_MAX_PUISSANCE};
use super::erreurs::{ErreurCalcul, ErreurNumerique, Resultat};

#[derive(Clone, Debug, PartialEq)]
pub enum Valeur {
    Reel(f64),
    Complexe(Complexe),
    Decimal(Decimal),
    Entier(BigInt),
}

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", super::format::formater(self))
    }
}

impl From<f64> for Valeur {
    fn from(x: f64) -> Self {
        Valeur::Reel(x)
    }
}

impl From<BigInt> for Valeur {
    fn from(n: BigInt) -> Self {
        Valeur::Entier(n)
    }
}

impl Valeur {
    pub fn booleen(b: bool) -> Self {
        Valeur::Reel(if b { 1.0 } else { 0.0 })
    }

    pub fn genre(&self) -> &'static str {
        match self {
            Valeur::Reel(_) => "réel",
            Valeur::Complexe(_) => "complexe",
            Valeur::Decimal(_) => "décimal",
            Valeur::Entier(_) => "entier",
        }
    }

    pub fn est_zero(&self) -> bool {
        match self {
            Valeur::Reel(x) => *x == 0.0,
            Valeur::Complexe(z) => complexe::est_nul(z),
            Valeur::Decimal(d) => d.is_zero(),
            Valeur::Entier(n) => n.is_zero(),
        }
    }

    pub fn est_complexe(&self) -> bool {
        matches!(self, Valeur::Complexe(_))
    }

    /// Valeur réelle (erreur si complexe non réel).
    pub fn vers_f64(&self) -> Resultat<f64> {
        match self {
            Valeur::Reel(x) => Ok(*x),
            Valeur::Complexe(z) => complexe::vers_reel(z),
            Valeur::Decimal(d) => Ok(d.vers_f64()),
            Valeur::Entier(n) => entier_vers_f64(n),
        }
    }

    pub fn vers_complexe(&self) -> Resultat<Complexe> {
        match self {
            Valeur::Complexe(z) => Ok(*z),
            autre => Ok(Complexe::new(autre.vers_f64()?, 0.0)),
        }
    }

    pub fn vers_decimal(&self, precision: u32) -> Resultat<Decimal> {
        match self {
            Valeur::Decimal(d) => Ok(d.clone()),
            Valeur::Entier(n) => Ok(Decimal::depuis_entier(n, precision)),
            Valeur::Reel(x) => Decimal::depuis_f64(*x, precision)
                .ok_or_else(|| ErreurCalcul::invalide(format!("{x} n'est pas un décimal fini"))),
            Valeur::Complexe(z) => {
                let x = complexe::vers_reel(z)?;
                Decimal::depuis_f64(x, precision)
                    .ok_or_else(|| ErreurCalcul::invalide(format!("{x} n'est pas un décimal fini")))
            }
        }
    }

    /// Entier exact si la valeur est entière, sinon None.
    pub fn vers_entier(&self) -> Option<BigInt> {
        match self {
            Valeur::Entier(n) => Some(n.clone()),
            Valeur::Decimal(d) if d.est_entier() => Some(d.vers_entier()),
            Valeur::Reel(x) if x.is_finite() && x.fract() == 0.0 => BigInt::from_f64(*x),
            Valeur::Complexe(z) if complexe::est_reel(z) && z.re.is_finite() && z.re.fract() == 0.0 => {
                BigInt::from_f64(z.re)
            }
            _ => None,
        }
    }

    pub fn precision_decimale(&self) -> Option<u32> {
        match self {
            Valeur::Decimal(d) => Some(d.precision()),
            _ => None,
        }
    }
}

fn entier_vers_f64(n: &BigInt) -> Resultat<f64> {
    match n.to_f64() {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(ErreurNumerique::Depassement.into()),
    }
}

/* ------------------------ Promotion ------------------------ */

/// Met deux opérandes dans leur type commun.
pub fn promouvoir(a: &Valeur, b: &Valeur) -> Resultat<(Valeur, Valeur)> {
    use Valeur::*;

    match (a, b) {
        (Complexe(_), _) | (_, Complexe(_)) => Ok((
            Complexe(a.vers_complexe()?),
            Complexe(b.vers_complexe()?),
        )),
        (Decimal(_), _) | (_, Decimal(_)) => {
            let p = a
                .precision_decimale()
                .max(b.precision_decimale())
                .unwrap_or_default();
            Ok((
                Decimal(a.vers_decimal(p)?.avec_precision(p)),
                Decimal(b.vers_decimal(p)?.avec_precision(p)),
            ))
        }
        (Entier(_), Entier(_)) => Ok((a.clone(), b.clone())),
        _ => Ok((Reel(a.vers_f64()?), Reel(b.vers_f64()?))),
    }
}

/* ------------------------ Arithmétique ------------------------ */

pub fn ajouter(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => Reel(x + y),
        (Complexe(x), Complexe(y)) => Complexe(x + y),
        (Decimal(x), Decimal(y)) => Decimal(x.add(&y)),
        (Entier(x), Entier(y)) => Entier(x + y),
        _ => return Err(incoherent()),
    })
}

pub fn soustraire(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => Reel(x - y),
        (Complexe(x), Complexe(y)) => Complexe(x - y),
        (Decimal(x), Decimal(y)) => Decimal(x.sub(&y)),
        (Entier(x), Entier(y)) => Entier(x - y),
        _ => return Err(incoherent()),
    })
}

pub fn multiplier(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => Reel(x * y),
        (Complexe(x), Complexe(y)) => Complexe(x * y),
        (Decimal(x), Decimal(y)) => Decimal(x.mul(&y)),
        (Entier(x), Entier(y)) => Entier(x * y),
        _ => return Err(incoherent()),
    })
}

/// Division ; entier / entier reste exact quand le quotient est entier.
pub fn diviser(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    if b.est_zero() {
        return Err(ErreurCalcul::DivisionParZero(format!("{a} / 0")));
    }
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => Reel(x / y),
        (Complexe(x), Complexe(y)) => Complexe(complexe::diviser(&x, &y)?),
        (Decimal(x), Decimal(y)) => Decimal(x.div(&y)?),
        (Entier(x), Entier(y)) => {
            if (&x % &y).is_zero() {
                Entier(x / y)
            } else {
                let q = BigRational::new(x, y);
                Reel(q.to_f64().ok_or(ErreurNumerique::Depassement)?)
            }
        }
        _ => return Err(incoherent()),
    })
}

/// Reste de la division tronquée (signe du dividende).
pub fn reste(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    if b.est_zero() {
        return Err(ErreurCalcul::DivisionParZero(format!("{a} % 0")));
    }
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => Reel(x % y),
        (Complexe(_), Complexe(_)) => return Err(non_defini_complexe("%")),
        (Decimal(x), Decimal(y)) => Decimal(x.rem(&y)?),
        (Entier(x), Entier(y)) => Entier(x % y),
        _ => return Err(incoherent()),
    })
}

/// Division entière par défaut : floor(a / b).
pub fn division_entiere(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    if b.est_zero() {
        return Err(ErreurCalcul::DivisionParZero(format!("{a} // 0")));
    }
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => Reel((x / y).floor()),
        (Complexe(_), Complexe(_)) => return Err(non_defini_complexe("//")),
        (Decimal(x), Decimal(y)) => Decimal(x.div_floor(&y)?),
        (Entier(x), Entier(y)) => Entier(div_floor(&x, &y)),
        _ => return Err(incoherent()),
    })
}

pub fn puissance(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    use Valeur::*;
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => {
            if x == 0.0 && y < 0.0 {
                return Err(ErreurCalcul::DivisionParZero("0 ^ exposant négatif".into()));
            }
            Reel(x.powf(y))
        }
        (Complexe(x), Complexe(y)) => Complexe(complexe::puissance(&x, &y)?),
        (Decimal(x), Decimal(y)) => {
            if x.is_zero() && y.is_negative() {
                return Err(ErreurCalcul::DivisionParZero("0 ^ exposant négatif".into()));
            }
            match y.est_entier().then(|| y.vers_entier().to_i64()).flatten() {
                Some(n) => Decimal(x.pow_int(n)?),
                None => {
                    // exposant non entier : passage par f64
                    let r = x.vers_f64().powf(y.vers_f64());
                    match super::decimal::Decimal::depuis_f64(r, x.precision()) {
                        Some(d) => Decimal(d),
                        None => Reel(r),
                    }
                }
            }
        }
        (Entier(x), Entier(y)) => puissance_entiere(&x, &y)?,
        _ => return Err(incoherent()),
    })
}

fn puissance_entiere(x: &BigInt, y: &BigInt) -> Resultat<Valeur> {
    if y.is_negative() {
        if x.is_zero() {
            return Err(ErreurCalcul::DivisionParZero("0 ^ exposant négatif".into()));
        }
        let base = entier_vers_f64(x)?;
        let exp = entier_vers_f64(y)?;
        return Ok(Valeur::Reel(base.powf(exp)));
    }

    // |x| <= 1 : résultat trivial, quel que soit l'exposant
    if x.abs() <= BigInt::from(1) {
        let pair = (y % 2u32).is_zero();
        return Ok(Valeur::Entier(if x.is_negative() && pair {
            BigInt::from(1)
        } else if y.is_zero() {
            BigInt::from(1)
        } else {
            x.clone()
        }));
    }

    let n = y
        .to_u32()
        .filter(|n| x.bits().saturating_mul(*n as u64) <= BITS_MAX_PUISSANCE)
        .ok_or(ErreurNumerique::Depassement)?;
    Ok(Valeur::Entier(x.pow(n)))
}

pub fn negation(a: &Valeur) -> Valeur {
    match a {
        Valeur::Reel(x) => Valeur::Reel(-x),
        Valeur::Complexe(z) => Valeur::Complexe(-z),
        Valeur::Decimal(d) => Valeur::Decimal(d.neg()),
        Valeur::Entier(n) => Valeur::Entier(-n),
    }
}

/* ------------------------ Comparaisons ------------------------ */

/// Ordre total (erreur pour les complexes, NaN refusé).
pub fn comparer(a: &Valeur, b: &Valeur) -> Resultat<Ordering> {
    use Valeur::*;
    match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => x
            .partial_cmp(&y)
            .ok_or_else(|| ErreurCalcul::invalide("comparaison avec NaN")),
        (Complexe(x), Complexe(y)) => {
            // ordre seulement si les deux sont réels
            match (complexe::vers_reel(&x), complexe::vers_reel(&y)) {
                (Ok(x), Ok(y)) => x
                    .partial_cmp(&y)
                    .ok_or_else(|| ErreurCalcul::invalide("comparaison avec NaN")),
                _ => Err(non_defini_complexe("<")),
            }
        }
        (Decimal(x), Decimal(y)) => Ok(x.cmp_valeur(&y)),
        (Entier(x), Entier(y)) => Ok(x.cmp(&y)),
        _ => Err(incoherent()),
    }
}

pub fn egal(a: &Valeur, b: &Valeur) -> Resultat<bool> {
    use Valeur::*;
    Ok(match promouvoir(a, b)? {
        (Reel(x), Reel(y)) => x == y,
        (Complexe(x), Complexe(y)) => x == y,
        (Decimal(x), Decimal(y)) => x == y,
        (Entier(x), Entier(y)) => x == y,
        _ => return Err(incoherent()),
    })
}

fn incoherent() -> ErreurCalcul {
    ErreurCalcul::invalide("promotion incohérente")
}

fn non_defini_complexe(op: &str) -> ErreurCalcul {
    ErreurCalcul::invalide(format!("'{op}' n'est pas défini pour les complexes"))
}

/* ------------------------ Garde IEEE-754 ------------------------ */

/// Validation des résultats f64 (régime ieee754).
pub struct Ieee754;

impl Ieee754 {
    pub fn valider(x: f64) -> Result<f64, ErreurNumerique> {
        if x.is_nan() {
            return Err(ErreurNumerique::OperationInvalide("résultat NaN".into()));
        }
        let a = x.abs();
        if a.is_infinite() || a > f64::MAX {
            return Err(ErreurNumerique::Depassement);
        }
        if a > 0.0 && a < f64::MIN_POSITIVE {
            return Err(ErreurNumerique::SousDepassement);
        }
        Ok(x)
    }

    pub fn valider_complexe(z: &Complexe) -> Result<Complexe, ErreurNumerique> {
        Ok(Complexe::new(Self::valider(z.re)?, Self::valider(z.im)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Valeur {
        Valeur::Decimal(Decimal::parse(s, 10).unwrap())
    }

    fn ent(n: i64) -> Valeur {
        Valeur::Entier(BigInt::from(n))
    }

    #[test]
    fn promotion_reel_complexe_donne_complexe() {
        let r = ajouter(&Valeur::Reel(1.0), &Valeur::Complexe(Complexe::new(2.0, 3.0))).unwrap();
        assert_eq!(r, Valeur::Complexe(Complexe::new(3.0, 3.0)));

        // même un complexe “réel” force le type complexe
        let r = multiplier(&ent(2), &Valeur::Complexe(Complexe::new(4.0, 0.0))).unwrap();
        assert!(r.est_complexe());
    }

    #[test]
    fn promotion_decimal_precision_max() {
        let a = Valeur::Decimal(Decimal::parse("1", 5).unwrap());
        let b = Valeur::Decimal(Decimal::parse("3", 30).unwrap());
        match promouvoir(&a, &b).unwrap() {
            (Valeur::Decimal(x), Valeur::Decimal(y)) => {
                assert_eq!(x.precision(), 30);
                assert_eq!(y.precision(), 30);
            }
            autre => panic!("promotion inattendue: {autre:?}"),
        }

        // décimal + réel => décimal
        let r = ajouter(&dec("0.1"), &Valeur::Reel(0.2)).unwrap();
        assert_eq!(r, dec("0.3"));
    }

    #[test]
    fn entiers_exacts() {
        assert_eq!(diviser(&ent(12), &ent(4)).unwrap(), ent(3));
        assert_eq!(diviser(&ent(7), &ent(2)).unwrap(), Valeur::Reel(3.5));
        assert_eq!(reste(&ent(-7), &ent(2)).unwrap(), ent(-1));
        assert_eq!(division_entiere(&ent(-7), &ent(2)).unwrap(), ent(-4));

        let p = puissance(&ent(2), &ent(100)).unwrap();
        assert_eq!(p.to_string(), "1267650600228229401496703205376");
        assert_eq!(puissance(&ent(-1), &ent(1_000_001)).unwrap(), ent(-1));
        assert_eq!(puissance(&ent(2), &ent(-1)).unwrap(), Valeur::Reel(0.5));
    }

    #[test]
    fn divisions_par_zero_gardees() {
        for f in [diviser, reste, division_entiere] {
            assert!(matches!(
                f(&Valeur::Reel(5.0), &Valeur::Reel(0.0)),
                Err(ErreurCalcul::DivisionParZero(_))
            ));
            assert!(matches!(
                f(&ent(5), &ent(0)),
                Err(ErreurCalcul::DivisionParZero(_))
            ));
        }
        assert!(matches!(
            diviser(&Valeur::Complexe(Complexe::new(1.0, 1.0)), &Valeur::Reel(0.0)),
            Err(ErreurCalcul::DivisionParZero(_))
        ));
    }

    #[test]
    fn comparaisons() {
        assert_eq!(comparer(&ent(2), &Valeur::Reel(2.5)).unwrap(), Ordering::Less);
        assert_eq!(comparer(&dec("0.30"), &dec("0.3")).unwrap(), Ordering::Equal);
        assert!(comparer(&Valeur::Complexe(Complexe::new(0.0, 1.0)), &ent(1)).is_err());
        assert!(egal(&ent(3), &Valeur::Reel(3.0)).unwrap());
    }

    #[test]
    fn garde_ieee754() {
        assert_eq!(Ieee754::valider(1.5), Ok(1.5));
        assert_eq!(Ieee754::valider(f64::INFINITY), Err(ErreurNumerique::Depassement));
        assert_eq!(Ieee754::valider(1e-310), Err(ErreurNumerique::SousDepassement));
        assert!(matches!(
            Ieee754::valider(f64::NAN),
            Err(ErreurNumerique::OperationInvalide(_))
        ));
        assert_eq!(Ieee754::valider(0.0), Ok(0.0));
    }
}
