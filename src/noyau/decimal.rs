// src/noyau/decimal.rs
//
// Décimal exact (entier “scalé”)
// ------------------------------
// valeur = scaled / 10^echelle, avec `precision` = nombre de décimales à conserver.
//
// - + − × : exacts (l'échelle grandit, l'arrondi se fait à la normalisation)
// - ÷ et √ : calculés à precision + GARDE décimales, arrondi “vers impair” si inexact
//   (le dernier chiffre garde la trace du reste => l'arrondi final reste correct
//   quelle que soit la politique)
// - π (Machin) et e (série) calculés directement à la précision demandée

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;

use super::erreurs::{ErreurCalcul, Resultat};
use super::modes::Arrondi;

/// Décimales supplémentaires pour ÷, √, π, e.
const GARDE: u32 = 4;

/// Garde-fou sur les échelles (puissances, littéraux à gros exposant).
const ECHELLE_MAX: u32 = 20_000;

/// Garde-fou : taille (en bits) d'une puissance exacte (entière ou décimale).
pub const BITS_MAX_PUISSANCE: u64 = 1 << 17;

fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

#[derive(Clone, Debug)]
pub struct Decimal {
    scaled: BigInt,
    echelle: u32,
    precision: u32,
}

impl Decimal {
    pub fn new(scaled: BigInt, echelle: u32, precision: u32) -> Self {
        Self {
            scaled,
            echelle,
            precision,
        }
    }

    pub fn zero(precision: u32) -> Self {
        Self::new(BigInt::zero(), 0, precision)
    }

    pub fn depuis_entier(n: &BigInt, precision: u32) -> Self {
        Self::new(n.clone(), 0, precision)
    }

    /// Lecture d'un littéral : [-+]chiffres[.chiffres][e[-+]chiffres]
    pub fn parse(s: &str, precision: u32) -> Option<Self> {
        let s = s.trim();
        let (neg, corps) = match s.as_bytes().first()? {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantisse, exposant) = match corps.find(['e', 'E']) {
            Some(p) => (&corps[..p], corps[p + 1..].parse::<i64>().ok()?),
            None => (corps, 0),
        };

        let (ent, frac) = match mantisse.find('.') {
            Some(p) => (&mantisse[..p], &mantisse[p + 1..]),
            None => (mantisse, ""),
        };
        if ent.is_empty() && frac.is_empty() {
            return None;
        }
        if !ent.bytes().chain(frac.bytes()).all(|c| c.is_ascii_digit()) {
            return None;
        }

        let chiffres = format!("{ent}{frac}");
        let mut scaled = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
        if neg {
            scaled = -scaled;
        }

        // valeur = chiffres * 10^(exposant - len(frac))
        let echelle = (frac.len() as i64).checked_sub(exposant)?;
        if echelle.unsigned_abs() > ECHELLE_MAX as u64 {
            return None;
        }
        if echelle >= 0 {
            Some(Self::new(scaled, echelle as u32, precision))
        } else {
            Some(Self::new(
                scaled * pow10((-echelle) as u32),
                0,
                precision,
            ))
        }
    }

    /// f64 -> décimal via sa plus courte écriture (0.1 reste 0.1).
    pub fn depuis_f64(x: f64, precision: u32) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        Self::parse(&format!("{x:e}"), precision)
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn avec_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn is_zero(&self) -> bool {
        self.scaled.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.scaled.is_negative()
    }

    pub fn est_entier(&self) -> bool {
        (&self.scaled % pow10(self.echelle)).is_zero()
    }

    /// Partie entière (troncature vers zéro).
    pub fn vers_entier(&self) -> BigInt {
        &self.scaled / pow10(self.echelle)
    }

    pub fn vers_rationnel(&self) -> BigRational {
        BigRational::new(self.scaled.clone(), pow10(self.echelle))
    }

    pub fn vers_f64(&self) -> f64 {
        // via le texte : conversion correctement arrondie par la lib standard
        self.texte_brut().parse::<f64>().unwrap_or_else(|_| {
            self.vers_rationnel().to_f64().unwrap_or(f64::NAN)
        })
    }

    pub fn neg(&self) -> Self {
        Self::new(-&self.scaled, self.echelle, self.precision)
    }

    pub fn abs(&self) -> Self {
        Self::new(self.scaled.abs(), self.echelle, self.precision)
    }

    /* ------------------------ Arithmétique ------------------------ */

    /// Ramène deux décimaux à la même échelle.
    fn aligner(&self, autre: &Self) -> (BigInt, BigInt, u32) {
        let e = self.echelle.max(autre.echelle);
        let a = &self.scaled * pow10(e - self.echelle);
        let b = &autre.scaled * pow10(e - autre.echelle);
        (a, b, e)
    }

    fn precision_commune(&self, autre: &Self) -> u32 {
        self.precision.max(autre.precision)
    }

    pub fn add(&self, autre: &Self) -> Self {
        let (a, b, e) = self.aligner(autre);
        Self::new(a + b, e, self.precision_commune(autre))
    }

    pub fn sub(&self, autre: &Self) -> Self {
        let (a, b, e) = self.aligner(autre);
        Self::new(a - b, e, self.precision_commune(autre))
    }

    pub fn mul(&self, autre: &Self) -> Self {
        Self::new(
            &self.scaled * &autre.scaled,
            self.echelle + autre.echelle,
            self.precision_commune(autre),
        )
        .reduire()
    }

    pub fn div(&self, autre: &Self) -> Resultat<Self> {
        if autre.is_zero() {
            return Err(ErreurCalcul::DivisionParZero(format!("{self} / 0")));
        }
        let precision = self.precision_commune(autre);
        let t = precision + GARDE;

        // a/b * 10^t = sa * 10^(eb + t) / (sb * 10^ea)
        let num = &self.scaled * pow10(autre.echelle + t);
        let den = &autre.scaled * pow10(self.echelle);
        let q = &num / &den;
        let exact = (&num % &den).is_zero();

        // signe du quotient (q peut valoir 0 si |a/b| < 10^-t)
        let negatif = self.is_negative() != autre.is_negative();
        Ok(Self::new(vers_impair(q, exact, negatif), t, precision).reduire())
    }

    /// Reste (signe du dividende, comme la division tronquée).
    pub fn rem(&self, autre: &Self) -> Resultat<Self> {
        if autre.is_zero() {
            return Err(ErreurCalcul::DivisionParZero(format!("{self} % 0")));
        }
        let (a, b, e) = self.aligner(autre);
        Ok(Self::new(a % b, e, self.precision_commune(autre)).reduire())
    }

    /// Division entière par défaut (floor).
    pub fn div_floor(&self, autre: &Self) -> Resultat<Self> {
        if autre.is_zero() {
            return Err(ErreurCalcul::DivisionParZero(format!("{self} // 0")));
        }
        let (a, b, _) = self.aligner(autre);
        Ok(Self::new(
            div_floor(&a, &b),
            0,
            self.precision_commune(autre),
        ))
    }

    /// Puissance entière (exposant négatif => inverse).
    pub fn pow_int(&self, n: i64) -> Resultat<Self> {
        let m = n.unsigned_abs();
        let echelle = (self.echelle as u64)
            .checked_mul(m)
            .filter(|e| *e <= ECHELLE_MAX as u64)
            .ok_or_else(|| ErreurCalcul::invalide("exposant trop grand pour un décimal"))?;
        let m = u32::try_from(m)
            .ok()
            .filter(|m| self.scaled.bits().saturating_mul(u64::from(*m)) <= BITS_MAX_PUISSANCE)
            .ok_or_else(|| ErreurCalcul::invalide("exposant trop grand pour un décimal"))?;

        let p = Self::new(self.scaled.pow(m), echelle as u32, self.precision).reduire();
        if n >= 0 {
            Ok(p)
        } else {
            Self::new(BigInt::one(), 0, self.precision).div(&p)
        }
    }

    /// √ à precision + GARDE décimales.
    pub fn racine(&self) -> Resultat<Self> {
        if self.is_negative() {
            return Err(ErreurCalcul::invalide("√ d'un décimal négatif"));
        }
        // t tel que 2t >= echelle : M = scaled * 10^(2t - echelle) est entier
        let t = (self.precision + GARDE).max(self.echelle.div_ceil(2));
        let m = &self.scaled * pow10(2 * t - self.echelle);
        let y = racine_entiere(&m);
        let exact = &y * &y == m;
        Ok(Self::new(vers_impair(y, exact, false), t, self.precision).reduire())
    }

    /// Arrondi à `precision` décimales selon la politique.
    pub fn arrondir(&self, precision: u32, politique: Arrondi) -> Self {
        if self.echelle <= precision {
            return Self::new(self.scaled.clone(), self.echelle, precision);
        }
        let diviseur = pow10(self.echelle - precision);
        let mut q = &self.scaled / &diviseur;
        let r = &self.scaled % &diviseur;

        if !r.is_zero() {
            let positif = self.scaled.is_positive();
            let un = BigInt::one();
            match politique {
                Arrondi::VersZero => {}
                Arrondi::Bas => {
                    if !positif {
                        q -= &un;
                    }
                }
                Arrondi::Haut => {
                    if positif {
                        q += &un;
                    }
                }
                Arrondi::Proche => {
                    if r.abs() * 2u32 >= diviseur {
                        if positif {
                            q += &un;
                        } else {
                            q -= &un;
                        }
                    }
                }
            }
        }
        Self::new(q, precision, precision).reduire()
    }

    /// Retire les zéros de fin (même valeur, échelle minimale).
    fn reduire(mut self) -> Self {
        let dix = BigInt::from(10);
        while self.echelle > 0 && (&self.scaled % &dix).is_zero() {
            self.scaled /= &dix;
            self.echelle -= 1;
        }
        self
    }

    /* ------------------------ Constantes ------------------------ */

    /// π à `precision` décimales (Machin : π = 16·atan(1/5) − 4·atan(1/239)).
    pub fn pi(precision: u32) -> Self {
        let t = precision + GARDE;
        // extra pour amortir les erreurs de troncature de la série
        let extra = 10;
        let scale = pow10(t + extra);

        let a = arctan_inv_q_scaled(5, &scale);
        let b = arctan_inv_q_scaled(239, &scale);
        let pi = (BigInt::from(16) * a - BigInt::from(4) * b) / pow10(extra);

        Self::new(vers_impair(pi, false, false), t, precision)
    }

    /// e à `precision` décimales (Σ 1/k!).
    pub fn e(precision: u32) -> Self {
        let t = precision + GARDE;
        let extra = 10;
        let scale = pow10(t + extra);

        let mut somme = BigInt::zero();
        let mut terme = scale.clone();
        let mut k: u32 = 1;
        while !terme.is_zero() {
            somme += &terme;
            terme /= k;
            k += 1;
        }
        let e = somme / pow10(extra);
        Self::new(vers_impair(e, false, false), t, precision)
    }

    /* ------------------------ Texte ------------------------ */

    /// Écriture complète (toutes les décimales de l'échelle).
    fn texte_brut(&self) -> String {
        scaled_to_decimal(&self.scaled, self.echelle)
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_valeur(other) == Ordering::Equal
    }
}

impl Decimal {
    pub fn cmp_valeur(&self, autre: &Self) -> Ordering {
        let (a, b, _) = self.aligner(autre);
        a.cmp(&b)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let brut = self.texte_brut();
        if brut.contains('.') {
            let t = brut.trim_end_matches('0').trim_end_matches('.');
            write!(f, "{t}")
        } else {
            write!(f, "{brut}")
        }
    }
}

/* ------------------------ Outils entiers ------------------------ */

/// Convertit un entier “scalé” (×10^digits) en texte décimal.
pub fn scaled_to_decimal(scaled: &BigInt, digits: u32) -> String {
    let neg = scaled.is_negative();
    let abs = scaled.abs();

    let scale = pow10(digits);
    let int_part = &abs / &scale;
    let frac_part = &abs % &scale;

    let signe = if neg { "-" } else { "" };
    if digits == 0 {
        return format!("{signe}{int_part}");
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits as usize {
        frac.insert(0, '0');
    }
    format!("{signe}{int_part}.{frac}")
}

/// Quotient tronqué inexact => voisin impair (le chiffre de poids faible porte le reste).
fn vers_impair(q: BigInt, exact: bool, negatif: bool) -> BigInt {
    if exact || !(&q % 2u32).is_zero() {
        return q;
    }
    if negatif {
        q - 1u32
    } else {
        q + 1u32
    }
}

/// floor(a / b) pour b ≠ 0.
pub fn div_floor(a: &BigInt, b: &BigInt) -> BigInt {
    let q = a / b;
    let r = a % b;
    if !r.is_zero() && (r.is_negative() != b.is_negative()) {
        q - 1u32
    } else {
        q
    }
}

/// floor(√n) par Newton (n ≥ 0).
pub fn racine_entiere(n: &BigInt) -> BigInt {
    if n.is_zero() || n.is_negative() {
        return BigInt::zero();
    }

    // point de départ : 10^(ceil(chiffres/2)) >= √n
    let chiffres = n.to_str_radix(10).len() as u32;
    let mut y = pow10(chiffres.div_ceil(2));

    loop {
        let y_next = (&y + n / &y) >> 1;
        if y_next >= y {
            break;
        }
        y = y_next;
    }

    // ajustement final (floor)
    while &y * &y > *n {
        y -= 1u32;
    }
    while (&y + 1u32) * (&y + 1u32) <= *n {
        y += 1u32;
    }
    y
}

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);

    let mut k: usize = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q.clone();
    let mut sum = BigInt::zero();

    loop {
        let d = &q_pow * BigInt::from(2 * k + 1);

        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q;
        q_pow *= &q;

        sign_pos = !sign_pos;
        k += 1;
    }

    sum
}
