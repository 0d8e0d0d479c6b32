// src/noyau/bibliotheque.rs
//
// Fonctions mathématiques standard
// --------------------------------
// Chaque fonction accepte toutes les représentations :
// - complexe : formule complexe (ou erreur si la fonction n'a pas de sens)
// - entier : exact quand l'opération est entière (abs, gcd, lcm, fact, ncr, npr, sum, min, max)
// - décimal : sqrt exacte, arrondis exacts, sinon passage par f64
// - réel : f64 ; un NaN hors domaine est relancé en complexe par l'évaluateur (mode on/auto)

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::f64::consts::{FRAC_2_SQRT_PI, FRAC_PI_2, LN_10, LN_2, PI, TAU};

use super::complexe::{self, Complexe, I};
use super::decimal::{racine_entiere, Decimal};
use super::erreurs::{ErreurCalcul, ErreurNumerique, Resultat};
use super::fonctions::{Arite, Categorie, DescripteurFonction, RegistreFonctions, RoleAngle};
use super::modes::Arrondi;
use super::nombres::{self, Valeur};

/// Garde-fou : n max pour fact / ncr / npr exacts.
const ENTIER_MAX: u64 = 10_000;

type Unaire = fn(&Valeur) -> Resultat<Valeur>;
type Binaire = fn(&Valeur, &Valeur) -> Resultat<Valeur>;
type Variadique = fn(&[Valeur]) -> Resultat<Valeur>;

fn unaire(nom: &'static str, categorie: Categorie, description: &str, f: Unaire) -> DescripteurFonction {
    DescripteurFonction::new(nom, Arite::Fixe(1), categorie, description, move |a| match a {
        [x] => f(x),
        _ => Err(ErreurCalcul::arite(nom, 1, a.len())),
    })
}

fn binaire(nom: &'static str, categorie: Categorie, description: &str, f: Binaire) -> DescripteurFonction {
    DescripteurFonction::new(nom, Arite::Fixe(2), categorie, description, move |a| match a {
        [x, y] => f(x, y),
        _ => Err(ErreurCalcul::arite(nom, 2, a.len())),
    })
}

fn variadique(nom: &'static str, description: &str, f: Variadique) -> DescripteurFonction {
    DescripteurFonction::new(nom, Arite::Variadique, Categorie::Statistique, description, move |a| {
        if a.is_empty() {
            return Err(ErreurCalcul::arite(nom, "au moins 1", 0));
        }
        f(a)
    })
}

/// Remplit le registre avec toutes les fonctions standard.
pub fn enregistrer_tout(r: &mut RegistreFonctions) {
    use Categorie as C;
    use RoleAngle::{Entree, Sortie};

    let fonctions = [
        // trigo (argument = angle)
        unaire("sin", C::Trigo, "sinus", sin).avec_angle(Entree),
        unaire("cos", C::Trigo, "cosinus", cos).avec_angle(Entree),
        unaire("tan", C::Trigo, "tangente", tan).avec_angle(Entree),
        unaire("sec", C::Trigo, "sécante 1/cos", sec).avec_angle(Entree),
        unaire("csc", C::Trigo, "cosécante 1/sin", csc).avec_angle(Entree),
        unaire("cot", C::Trigo, "cotangente 1/tan", cot).avec_angle(Entree),
        // trigo inverse (résultat = angle)
        unaire("asin", C::TrigoInverse, "arc sinus", asin).avec_angle(Sortie),
        unaire("acos", C::TrigoInverse, "arc cosinus", acos).avec_angle(Sortie),
        unaire("atan", C::TrigoInverse, "arc tangente", atan).avec_angle(Sortie),
        binaire("atan2", C::TrigoInverse, "angle du point (x = 2e arg, y = 1er arg)", atan2)
            .avec_angle(Sortie),
        // hyperboliques
        unaire("sinh", C::Hyperbolique, "sinus hyperbolique", sinh),
        unaire("cosh", C::Hyperbolique, "cosinus hyperbolique", cosh),
        unaire("tanh", C::Hyperbolique, "tangente hyperbolique", tanh),
        unaire("asinh", C::Hyperbolique, "argument sinus hyperbolique", asinh),
        unaire("acosh", C::Hyperbolique, "argument cosinus hyperbolique", acosh),
        unaire("atanh", C::Hyperbolique, "argument tangente hyperbolique", atanh),
        // exponentielles / logarithmes
        unaire("exp", C::Exponentielle, "exponentielle", exp),
        unaire("ln", C::Exponentielle, "logarithme népérien", ln),
        unaire("log", C::Exponentielle, "logarithme décimal", log10),
        unaire("log2", C::Exponentielle, "logarithme binaire", log2),
        binaire("logb", C::Exponentielle, "logarithme de x en base y", logb),
        binaire("pow", C::Exponentielle, "x puissance y", nombres::puissance),
        unaire("sqrt", C::Exponentielle, "racine carrée", sqrt),
        unaire("cbrt", C::Exponentielle, "racine cubique", cbrt),
        // arrondis / parties
        unaire("abs", C::Arrondi, "valeur absolue (module pour un complexe)", abs),
        unaire("floor", C::Arrondi, "partie entière par défaut", floor),
        unaire("ceil", C::Arrondi, "partie entière par excès", ceil),
        unaire("trunc", C::Arrondi, "troncature vers zéro", trunc),
        unaire("round", C::Arrondi, "entier le plus proche (demi loin de zéro)", round),
        unaire("sign", C::Arrondi, "signe : -1, 0 ou 1", sign),
        // spéciales
        unaire("gamma", C::Speciale, "fonction Γ (Lanczos)", gamma),
        unaire("fact", C::Speciale, "factorielle (exacte pour un entier)", fact),
        unaire("erf", C::Speciale, "fonction d'erreur", erf),
        // arithmétique entière
        binaire("gcd", C::Arithmetique, "plus grand commun diviseur", gcd),
        binaire("lcm", C::Arithmetique, "plus petit commun multiple", lcm),
        binaire("ncr", C::Arithmetique, "combinaisons C(n, k)", ncr),
        binaire("npr", C::Arithmetique, "arrangements A(n, k)", npr),
        // statistiques
        variadique("sum", "somme", somme),
        variadique("avg", "moyenne", moyenne),
        variadique("min", "minimum", minimum),
        variadique("max", "maximum", maximum),
        variadique("median", "médiane", mediane),
        variadique("variance", "variance (population)", variance),
        variadique("stddev", "écart type (population)", ecart_type),
        // complexes
        unaire("re", C::Complexe, "partie réelle", re),
        unaire("im", C::Complexe, "partie imaginaire", im),
        unaire("conj", C::Complexe, "conjugué", conj),
        unaire("arg", C::Complexe, "argument (radians)", arg),
    ];

    for d in fonctions {
        r.enregistrer(d);
    }
}

/* ------------------------ Outils ------------------------ */

/// Réel -> f64, complexe -> formule complexe.
fn reel_ou_complexe(
    a: &Valeur,
    fr: impl Fn(f64) -> f64,
    fc: impl Fn(&Complexe) -> Resultat<Complexe>,
) -> Resultat<Valeur> {
    match a {
        Valeur::Complexe(z) => Ok(Valeur::Complexe(fc(z)?)),
        v => Ok(Valeur::Reel(fr(v.vers_f64()?))),
    }
}

/// Fonction définie seulement sur les réels.
fn reel(nom: &str, a: &Valeur) -> Resultat<f64> {
    match a {
        Valeur::Complexe(z) if !complexe::est_reel(z) => Err(non_complexe(nom)),
        v => v.vers_f64(),
    }
}

fn non_complexe(nom: &str) -> ErreurCalcul {
    ErreurCalcul::invalide(format!("{nom} n'est pas défini pour les complexes"))
}

fn entier(nom: &str, a: &Valeur) -> Resultat<BigInt> {
    a.vers_entier()
        .ok_or_else(|| ErreurCalcul::invalide(format!("{nom} : argument entier attendu, reçu {a}")))
}

fn petit_entier(nom: &str, n: &BigInt) -> Resultat<u64> {
    if n.is_negative() {
        return Err(ErreurCalcul::invalide(format!("{nom} : entier négatif {n}")));
    }
    n.to_u64()
        .filter(|n| *n <= ENTIER_MAX)
        .ok_or_else(|| ErreurNumerique::Depassement.into())
}

fn un() -> Valeur {
    Valeur::Entier(BigInt::one())
}

fn c(re: f64) -> Complexe {
    Complexe::new(re, 0.0)
}

/* ------------------------ Trigonométrie ------------------------ */

fn sin(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::sin, |z| Ok(complexe::sin(z)))
}

fn cos(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::cos, |z| Ok(complexe::cos(z)))
}

fn tan(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::tan, complexe::tan)
}

fn sec(a: &Valeur) -> Resultat<Valeur> {
    nombres::diviser(&un(), &cos(a)?)
}

fn csc(a: &Valeur) -> Resultat<Valeur> {
    nombres::diviser(&un(), &sin(a)?)
}

fn cot(a: &Valeur) -> Resultat<Valeur> {
    nombres::diviser(&un(), &tan(a)?)
}

/// asin z = −i·ln(iz + √(1 − z²))
fn asin_c(z: &Complexe) -> Resultat<Complexe> {
    let w = I * z + complexe::racine(&(c(1.0) - z * z));
    Ok(-I * complexe::ln(&w)?)
}

/// atan z = (i/2)·(ln(1 − iz) − ln(1 + iz))
fn atan_c(z: &Complexe) -> Resultat<Complexe> {
    let iz = I * z;
    Ok(I / 2.0 * (complexe::ln(&(c(1.0) - iz))? - complexe::ln(&(c(1.0) + iz))?))
}

fn asin(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::asin, asin_c)
}

fn acos(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::acos, |z| Ok(c(FRAC_PI_2) - asin_c(z)?))
}

fn atan(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::atan, atan_c)
}

fn atan2(y: &Valeur, x: &Valeur) -> Resultat<Valeur> {
    Ok(Valeur::Reel(reel("atan2", y)?.atan2(reel("atan2", x)?)))
}

/* ------------------------ Hyperboliques ------------------------ */

fn sinh_c(z: &Complexe) -> Complexe {
    (complexe::exp(z) - complexe::exp(&-z)) / 2.0
}

fn cosh_c(z: &Complexe) -> Complexe {
    (complexe::exp(z) + complexe::exp(&-z)) / 2.0
}

fn sinh(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::sinh, |z| Ok(sinh_c(z)))
}

fn cosh(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::cosh, |z| Ok(cosh_c(z)))
}

fn tanh(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::tanh, |z| complexe::diviser(&sinh_c(z), &cosh_c(z)))
}

/// asinh z = ln(z + √(z² + 1))
fn asinh(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::asinh, |z| {
        complexe::ln(&(z + complexe::racine(&(z * z + 1.0))))
    })
}

/// acosh z = ln(z + √(z + 1)·√(z − 1))
fn acosh(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::acosh, |z| {
        complexe::ln(&(z + complexe::racine(&(z + 1.0)) * complexe::racine(&(z - 1.0))))
    })
}

/// atanh z = (ln(1 + z) − ln(1 − z)) / 2
fn atanh(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::atanh, |z| {
        Ok((complexe::ln(&(c(1.0) + z))? - complexe::ln(&(c(1.0) - z))?) / 2.0)
    })
}

/* ------------------------ Exponentielles / logarithmes ------------------------ */

fn exp(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::exp, |z| Ok(complexe::exp(z)))
}

/// ln(0) refusé explicitement ; ln(x < 0) = NaN (relancé en complexe si autorisé).
fn logarithme(a: &Valeur, fr: fn(f64) -> f64, diviseur: f64) -> Resultat<Valeur> {
    if a.est_zero() {
        return Err(ErreurCalcul::invalide("logarithme de 0"));
    }
    reel_ou_complexe(a, fr, |z| Ok(complexe::ln(z)? / diviseur))
}

fn ln(a: &Valeur) -> Resultat<Valeur> {
    logarithme(a, f64::ln, 1.0)
}

fn log10(a: &Valeur) -> Resultat<Valeur> {
    logarithme(a, f64::log10, LN_10)
}

fn log2(a: &Valeur) -> Resultat<Valeur> {
    logarithme(a, f64::log2, LN_2)
}

/// log_b(x) = ln x / ln b ; bases 2 et 10 par les fonctions dédiées (exactes sur les puissances).
fn logb(x: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    if x.est_zero() || b.est_zero() {
        return Err(ErreurCalcul::invalide("logarithme de 0"));
    }
    if x.est_complexe() || b.est_complexe() {
        let lx = complexe::ln(&x.vers_complexe()?)?;
        let lb = complexe::ln(&b.vers_complexe()?)?;
        return Ok(Valeur::Complexe(complexe::diviser(&lx, &lb)?));
    }

    let (x, b) = (x.vers_f64()?, b.vers_f64()?);
    if b == 1.0 {
        return Err(ErreurCalcul::DivisionParZero("logarithme en base 1".into()));
    }
    let r = if b == 2.0 {
        x.log2()
    } else if b == 10.0 {
        x.log10()
    } else {
        x.ln() / b.ln()
    };
    Ok(Valeur::Reel(r))
}

/// √ exacte pour un décimal ou un carré parfait ; NaN pour un réel négatif.
fn sqrt(a: &Valeur) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Complexe(z) => Valeur::Complexe(complexe::racine(z)),
        Valeur::Decimal(d) if !d.is_negative() => Valeur::Decimal(d.racine()?),
        Valeur::Entier(n) if !n.is_negative() => {
            let r = racine_entiere(n);
            if &r * &r == *n {
                Valeur::Entier(r)
            } else {
                Valeur::Reel(a.vers_f64()?.sqrt())
            }
        }
        autre => Valeur::Reel(autre.vers_f64()?.sqrt()),
    })
}

fn cbrt(a: &Valeur) -> Resultat<Valeur> {
    reel_ou_complexe(a, f64::cbrt, |z| complexe::puissance(z, &c(1.0 / 3.0)))
}

/* ------------------------ Arrondis / parties ------------------------ */

fn abs(a: &Valeur) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Reel(x) => Valeur::Reel(x.abs()),
        Valeur::Complexe(z) => Valeur::Reel(z.norm()),
        Valeur::Decimal(d) => Valeur::Decimal(d.abs()),
        Valeur::Entier(n) => Valeur::Entier(n.abs()),
    })
}

fn arrondi_entier(nom: &str, a: &Valeur, fr: fn(f64) -> f64, politique: Arrondi) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Reel(x) => Valeur::Reel(fr(*x)),
        Valeur::Complexe(z) if complexe::est_reel(z) => Valeur::Reel(fr(z.re)),
        Valeur::Complexe(_) => return Err(non_complexe(nom)),
        Valeur::Decimal(d) => Valeur::Decimal(d.arrondir(0, politique).avec_precision(d.precision())),
        Valeur::Entier(n) => Valeur::Entier(n.clone()),
    })
}

fn floor(a: &Valeur) -> Resultat<Valeur> {
    arrondi_entier("floor", a, f64::floor, Arrondi::Bas)
}

fn ceil(a: &Valeur) -> Resultat<Valeur> {
    arrondi_entier("ceil", a, f64::ceil, Arrondi::Haut)
}

fn trunc(a: &Valeur) -> Resultat<Valeur> {
    arrondi_entier("trunc", a, f64::trunc, Arrondi::VersZero)
}

fn round(a: &Valeur) -> Resultat<Valeur> {
    arrondi_entier("round", a, f64::round, Arrondi::Proche)
}

/// Signe ; z/|z| pour un complexe.
fn sign(a: &Valeur) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Reel(x) if *x == 0.0 => Valeur::Reel(0.0),
        Valeur::Reel(x) => Valeur::Reel(x.signum()),
        Valeur::Complexe(z) if complexe::est_nul(z) => Valeur::Reel(0.0),
        Valeur::Complexe(z) => Valeur::Complexe(z / z.norm()),
        Valeur::Decimal(d) => {
            let s = match d.cmp_valeur(&Decimal::zero(d.precision())) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            };
            Valeur::Decimal(Decimal::depuis_entier(&BigInt::from(s), d.precision()))
        }
        Valeur::Entier(n) => Valeur::Entier(n.signum()),
    })
}

/* ------------------------ Spéciales ------------------------ */

/// Γ(x) par Lanczos (g = 7, 9 coefficients) ; réflexion pour x < 1/2.
fn lanczos(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        return PI / ((PI * x).sin() * lanczos(1.0 - x));
    }
    let x = x - 1.0;
    let mut somme = COEFFS[0];
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        somme += c / (x + i as f64);
    }
    let t = x + G + 0.5;
    TAU.sqrt() * t.powf(x + 0.5) * (-t).exp() * somme
}

fn factorielle(n: u64) -> BigInt {
    (2..=n).fold(BigInt::one(), |acc, k| acc * k)
}

/// Γ(n) = (n − 1)! exact pour un entier positif ; pôles sur 0, −1, −2, …
fn gamma(a: &Valeur) -> Resultat<Valeur> {
    if let Some(n) = a.vers_entier() {
        if !n.is_positive() {
            return Err(ErreurCalcul::invalide(format!("gamma : pôle en {n}")));
        }
        let n = petit_entier("gamma", &n)?;
        return Ok(Valeur::Entier(factorielle(n - 1)));
    }
    Ok(Valeur::Reel(lanczos(reel("gamma", a)?)))
}

/// n! exact pour un entier naturel, Γ(x + 1) sinon.
fn fact(a: &Valeur) -> Resultat<Valeur> {
    match a.vers_entier() {
        Some(n) => Ok(Valeur::Entier(factorielle(petit_entier("fact", &n)?))),
        None => Ok(Valeur::Reel(lanczos(reel("fact", a)? + 1.0))),
    }
}

/// erf : série de Taylor pour |x| ≤ 3, fraction continue de erfc au-delà.
fn erf_reel(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    let a = x.abs();
    let r = if a <= 3.0 {
        let x2 = a * a;
        let mut terme = a;
        let mut somme = 0.0;
        let mut n = 0.0;
        loop {
            let t = terme / (2.0 * n + 1.0);
            somme += t;
            if t.abs() < 1e-17 * somme.abs() {
                break;
            }
            n += 1.0;
            terme *= -x2 / n;
        }
        FRAC_2_SQRT_PI * somme
    } else {
        // erfc(a) = e^{−a²}/√π · 1/(a + (1/2)/(a + 1/(a + (3/2)/(a + …))))
        let mut t = a;
        for k in (1..=60).rev() {
            t = a + (k as f64 / 2.0) / t;
        }
        1.0 - (-a * a).exp() * FRAC_2_SQRT_PI / (2.0 * t)
    };
    r.copysign(x)
}

fn erf(a: &Valeur) -> Resultat<Valeur> {
    Ok(Valeur::Reel(erf_reel(reel("erf", a)?)))
}

/* ------------------------ Arithmétique entière ------------------------ */

fn pgcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a.abs()
}

fn gcd(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    Ok(Valeur::Entier(pgcd(entier("gcd", a)?, entier("gcd", b)?)))
}

fn lcm(a: &Valeur, b: &Valeur) -> Resultat<Valeur> {
    let (a, b) = (entier("lcm", a)?, entier("lcm", b)?);
    if a.is_zero() || b.is_zero() {
        return Ok(Valeur::Entier(BigInt::zero()));
    }
    let g = pgcd(a.clone(), b.clone());
    Ok(Valeur::Entier((a / g * b).abs()))
}

/// n·(n−1)·…·(n−k+1)
fn produit_descendant(n: u64, k: u64) -> BigInt {
    (n - k + 1..=n).fold(BigInt::one(), |acc, m| acc * m)
}

fn arguments_combinatoires(nom: &str, n: &Valeur, k: &Valeur) -> Resultat<Option<(u64, u64)>> {
    let n = petit_entier(nom, &entier(nom, n)?)?;
    let k = entier(nom, k)?;
    if k.is_negative() {
        return Err(ErreurCalcul::invalide(format!("{nom} : k négatif")));
    }
    // k > n : aucun tirage possible
    Ok(k.to_u64().filter(|k| *k <= n).map(|k| (n, k)))
}

fn ncr(n: &Valeur, k: &Valeur) -> Resultat<Valeur> {
    Ok(Valeur::Entier(match arguments_combinatoires("ncr", n, k)? {
        Some((n, k)) => {
            let k = k.min(n - k);
            produit_descendant(n, k) / factorielle(k)
        }
        None => BigInt::zero(),
    }))
}

fn npr(n: &Valeur, k: &Valeur) -> Resultat<Valeur> {
    Ok(Valeur::Entier(match arguments_combinatoires("npr", n, k)? {
        Some((n, k)) => produit_descendant(n, k),
        None => BigInt::zero(),
    }))
}

/* ------------------------ Statistiques ------------------------ */

fn somme(a: &[Valeur]) -> Resultat<Valeur> {
    a[1..]
        .iter()
        .try_fold(a[0].clone(), |acc, x| nombres::ajouter(&acc, x))
}

fn moyenne(a: &[Valeur]) -> Resultat<Valeur> {
    nombres::diviser(&somme(a)?, &Valeur::Entier(BigInt::from(a.len())))
}

fn extremum(a: &[Valeur], garder: Ordering) -> Resultat<Valeur> {
    let mut meilleur = &a[0];
    for x in &a[1..] {
        if nombres::comparer(x, meilleur)? == garder {
            meilleur = x;
        }
    }
    Ok(meilleur.clone())
}

fn minimum(a: &[Valeur]) -> Resultat<Valeur> {
    extremum(a, Ordering::Less)
}

fn maximum(a: &[Valeur]) -> Resultat<Valeur> {
    extremum(a, Ordering::Greater)
}

fn mediane(a: &[Valeur]) -> Resultat<Valeur> {
    let mut v = a.to_vec();
    let mut erreur = None;
    v.sort_by(|x, y| {
        nombres::comparer(x, y).unwrap_or_else(|e| {
            erreur.get_or_insert(e);
            Ordering::Equal
        })
    });
    if let Some(e) = erreur {
        return Err(e);
    }

    let milieu = v.len() / 2;
    if v.len() % 2 == 1 {
        Ok(v[milieu].clone())
    } else {
        moyenne(&v[milieu - 1..=milieu])
    }
}

/// Variance de population : Σ(x − m)² / n.
fn variance(a: &[Valeur]) -> Resultat<Valeur> {
    let m = moyenne(a)?;
    let ecarts = a
        .iter()
        .map(|x| {
            let d = nombres::soustraire(x, &m)?;
            nombres::multiplier(&d, &d)
        })
        .collect::<Resultat<Vec<_>>>()?;
    moyenne(&ecarts)
}

fn ecart_type(a: &[Valeur]) -> Resultat<Valeur> {
    sqrt(&variance(a)?)
}

/* ------------------------ Complexes ------------------------ */

fn re(a: &Valeur) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Complexe(z) => Valeur::Reel(z.re),
        autre => autre.clone(),
    })
}

fn im(a: &Valeur) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Complexe(z) => Valeur::Reel(z.im),
        _ => Valeur::Entier(BigInt::zero()),
    })
}

fn conj(a: &Valeur) -> Resultat<Valeur> {
    Ok(match a {
        Valeur::Complexe(z) => Valeur::Complexe(z.conj()),
        autre => autre.clone(),
    })
}

fn arg(a: &Valeur) -> Resultat<Valeur> {
    let z = a.vers_complexe()?;
    if complexe::est_nul(&z) {
        return Err(ErreurCalcul::invalide("arg(0) non défini"));
    }
    Ok(Valeur::Reel(z.arg()))
}
