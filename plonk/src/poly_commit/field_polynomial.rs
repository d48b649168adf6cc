use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use redshift_algebra::prelude::*;

/// The radix-2 evaluation domain of a field.
pub type FpDomain<F> = Radix2EvaluationDomain<<F as Domain>::Field>;

/// Field polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients (or evaluations) of the polynomial
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use redshift_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use redshift_algebra::bls12_381::BLSScalar;
    /// use redshift_algebra::{Zero, One};
    /// let poly = FpPolynomial::<BLSScalar>::zero();
    /// let zero = BLSScalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&BLSScalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Return the constant one polynomial
    pub fn one() -> Self {
        Self::from_coefs(vec![F::one()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficient are trimmed.
    /// # Example
    /// ```
    /// use redshift_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use redshift_algebra::bls12_381::BLSScalar;
    /// use redshift_algebra::{Zero, One};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let two = one + one;
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&one), two);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Build a polynomial from its zeroes/roots.
    pub fn from_zeroes(zeroes: &[F]) -> Self {
        let mut r = Self::one();
        for root in zeroes.iter() {
            let mut p = r.clone();
            r.coefs.insert(0, F::zero()); // multiply by X
            p.mul_scalar_assign(root);
            r.sub_assign(&p); // r = r * (X - root)
        }
        r
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        let coefs = (0..degree + 1).map(|_| F::random(prng)).collect();
        Self::from_coefs(coefs)
    }

    /// Remove high degree zero-coefficients
    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
        if self.coefs.is_empty() {
            self.coefs.push(F::zero());
        }
    }

    /// Return degree of the polynomial, the zero polynomial has degree zero.
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs[0].is_zero()
    }

    /// Evaluate a polynomial on a point.
    pub fn eval(&self, point: &F) -> F {
        self.coefs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coef| acc * point + coef)
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtracts another polynomial from self.
    /// # Example:
    /// ```
    /// use redshift_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use redshift_algebra::bls12_381::BLSScalar;
    /// use redshift_algebra::{Zero, One};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let two = one + one;
    /// let three = two + one;
    /// let mut poly1 = FpPolynomial::from_coefs(vec![three, three, two]);
    /// let poly2 = FpPolynomial::from_coefs(vec![three, two, one, one]);
    /// poly1.sub_assign(&poly2);
    /// let poly_expected = FpPolynomial::from_coefs(vec![zero, one, one, -one]);
    /// assert_eq!(poly1, poly_expected);
    /// ```
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            self.coefs
                .extend(other.coefs[n..].iter().map(|other_coef| other_coef.neg()));
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Negate the coefficients.
    pub fn neg(&self) -> Self {
        Self::from_coefs(self.coefs.iter().map(|c| c.neg()).collect())
    }

    /// Add `coef` to the coefficient of order `order`.
    pub fn add_coef_assign(&mut self, coef: &F, order: usize) {
        if self.coefs.len() <= order {
            self.coefs.resize(order + 1, F::zero());
        }
        self.coefs[order].add_assign(coef);
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar)
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Multiply the polynomial variable by a scalar.
    /// mul_var(\sum a_i X^i, b) = \sum a_i b^i X^i
    /// # Example:
    /// ```
    /// use redshift_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use redshift_algebra::bls12_381::BLSScalar;
    /// use redshift_algebra::{Zero, One};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let two = one + one;
    /// let four = two + two;
    /// let poly = FpPolynomial::from_coefs(vec![zero, one, one]);
    /// let expected = FpPolynomial::from_coefs(vec![zero, two, four]);
    /// assert_eq!(poly.mul_var(&two), expected);
    /// ```
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut r = F::one();
        let coefs = self
            .coefs
            .iter()
            .map(|c| {
                let v = r * c;
                r.mul_assign(scalar);
                v
            })
            .collect();
        Self::from_coefs(coefs)
    }

    /// Multiply by `X^k`.
    pub fn shift(&self, k: usize) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let mut coefs = vec![F::zero(); k];
        coefs.extend_from_slice(&self.coefs);
        Self::from_coefs(coefs)
    }

    /// Schoolbook multiplication.
    pub fn mul(&self, other: &Self) -> Self {
        let mut coefs = vec![F::zero(); self.coefs.len() + other.coefs.len() - 1];
        for (i, a) in self.coefs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coefs.iter().enumerate() {
                coefs[i + j].add_assign(&a.mul(b));
            }
        }
        Self::from_coefs(coefs)
    }

    /// Divide polynomial to produce the quotient and remainder polynomials.
    /// # Example:
    /// ```
    /// use redshift_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use redshift_algebra::bls12_381::BLSScalar;
    /// use redshift_algebra::{Zero, One};
    /// let zero = BLSScalar::zero();
    /// let one = BLSScalar::one();
    /// let poly = FpPolynomial::from_coefs(vec![one, one, one]);
    /// let divisor = FpPolynomial::from_coefs(vec![one, one]);
    /// let (q, r) = poly.div_rem(&divisor).unwrap();
    /// assert_eq!(q, FpPolynomial::from_coefs(vec![zero, one]));
    /// assert_eq!(r, FpPolynomial::from_coefs(vec![one]));
    /// ```
    pub fn div_rem(&self, divisor: &Self) -> core::result::Result<(Self, Self), AlgebraError> {
        if divisor.is_zero() {
            return Err(AlgebraError::GroupInversionError);
        }
        let k = self.coefs.len();
        let l = divisor.coefs.len();
        if l > k {
            return Ok((Self::zero(), self.clone()));
        }
        let divisor_coefs = &divisor.coefs[..];
        let bl_inv = divisor_coefs[l - 1].inv()?;
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let qi = bl_inv * &rem[i + l - 1];
            for (j, d) in divisor_coefs.iter().enumerate() {
                rem[i + j].sub_assign(&qi.mul(d));
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        Ok((Self::from_coefs(quo), Self::from_coefs(rem)))
    }

    /// The unique polynomial of degree `< points.len()` with `p(points[i]) = values[i]`.
    pub fn lagrange_interpolation(
        points: &[F],
        values: &[F],
    ) -> core::result::Result<Self, AlgebraError> {
        if points.len() != values.len() {
            return Err(AlgebraError::ParameterError);
        }
        let mut result = Self::zero();
        for (i, (x_i, y_i)) in points.iter().zip(values.iter()).enumerate() {
            let others: Vec<F> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, x)| *x)
                .collect();
            let denominator = others
                .iter()
                .fold(F::one(), |acc, x_j| acc * (*x_i - x_j));
            let scale = y_i.mul(&denominator.inv()?);
            result.add_assign(&Self::from_zeroes(&others).mul_scalar(&scale));
        }
        Ok(result)
    }
}

impl<F: Domain> FpPolynomial<F> {
    /// Return the radix-2 domain with exactly `num_points` elements.
    pub fn evaluation_domain(num_points: usize) -> Option<FpDomain<F>> {
        if !num_points.is_power_of_two() {
            return None;
        }
        FpDomain::<F>::new(num_points).filter(|d| d.size() == num_points)
    }

    /// Return the generator of the domain.
    pub fn domain_generator(domain: &FpDomain<F>) -> F {
        F::from_field(domain.group_gen)
    }

    /// Compute the FFT of the polynomial over the domain. Coefficients beyond
    /// the domain size are folded with `X^size = 1`.
    pub fn fft_with_domain(&self, domain: &FpDomain<F>) -> Vec<F> {
        let size = domain.size();
        let mut coefs = vec![<F as Domain>::Field::default(); size];
        for (i, c) in self.coefs.iter().enumerate() {
            coefs[i % size] += c.get_field();
        }
        domain.fft(&coefs).into_iter().map(F::from_field).collect()
    }

    /// Compute the FFT of the polynomial on the set k * <root>.
    pub fn coset_fft_with_domain(&self, domain: &FpDomain<F>, k: &F) -> Vec<F> {
        self.mul_var(k).fft_with_domain(domain)
    }

    /// Compute the polynomial given its evaluations over the domain.
    pub fn ffti(domain: &FpDomain<F>, values: &[F]) -> Self {
        let mut evals: Vec<<F as Domain>::Field> = values.iter().map(|v| v.get_field()).collect();
        evals.resize(domain.size(), <F as Domain>::Field::default());
        Self::from_coefs(domain.ifft(&evals).into_iter().map(F::from_field).collect())
    }

    /// Compute the polynomial given its evaluation values at a coset k * H,
    /// where `k_inv` is the inverse of k.
    pub fn coset_ffti(domain: &FpDomain<F>, values: &[F], k_inv: &F) -> Self {
        Self::ffti(domain, values).mul_var(k_inv)
    }
}

#[cfg(test)]
mod test {
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use rand_chacha::ChaChaRng;
    use redshift_algebra::{bls12_381::BLSScalar, prelude::*};

    #[test]
    fn from_zeroes() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let zeroes: Vec<BLSScalar> = (0..10).map(|_| BLSScalar::random(&mut prng)).collect();
        let poly = FpPolynomial::from_zeroes(&zeroes[..]);
        assert_eq!(poly.degree(), 10);
        for root in zeroes.iter() {
            assert_eq!(BLSScalar::zero(), poly.eval(root));
        }
    }

    #[test]
    fn test_fft() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        for n in [1usize, 2, 4, 16, 32] {
            let polynomial = FpPolynomial::<BLSScalar>::random(&mut prng, n - 1);
            let domain = FpPolynomial::<BLSScalar>::evaluation_domain(n).unwrap();
            let root = FpPolynomial::<BLSScalar>::domain_generator(&domain);
            let fft = polynomial.fft_with_domain(&domain);

            let mut omega = BLSScalar::one();
            for v in fft.iter() {
                assert_eq!(*v, polynomial.eval(&omega));
                omega.mul_assign(&root);
            }
            assert_eq!(omega, BLSScalar::one());
            assert_eq!(FpPolynomial::ffti(&domain, &fft), polynomial);
        }
        assert!(FpPolynomial::<BLSScalar>::evaluation_domain(12).is_none());
    }

    #[test]
    fn test_fft_folds_high_degree() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let polynomial = FpPolynomial::<BLSScalar>::random(&mut prng, 11);
        let domain = FpPolynomial::<BLSScalar>::evaluation_domain(4).unwrap();
        let root = FpPolynomial::<BLSScalar>::domain_generator(&domain);
        let fft = polynomial.fft_with_domain(&domain);
        let mut omega = BLSScalar::one();
        for v in fft.iter() {
            assert_eq!(*v, polynomial.eval(&omega));
            omega.mul_assign(&root);
        }
    }

    #[test]
    fn test_coset_fft() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let polynomial = FpPolynomial::<BLSScalar>::random(&mut prng, 15);
        let domain = FpPolynomial::<BLSScalar>::evaluation_domain(16).unwrap();
        let root = FpPolynomial::<BLSScalar>::domain_generator(&domain);
        let k = BLSScalar::multiplicative_generator();

        let evals = polynomial.coset_fft_with_domain(&domain, &k);
        let mut point = k;
        for v in evals.iter() {
            assert_eq!(*v, polynomial.eval(&point));
            point.mul_assign(&root);
        }
        let back = FpPolynomial::coset_ffti(&domain, &evals, &k.inv().unwrap());
        assert_eq!(back, polynomial);
    }

    #[test]
    fn test_div_rem() {
        let mut prng = ChaChaRng::from_seed([3u8; 32]);
        let a = FpPolynomial::<BLSScalar>::random(&mut prng, 20);
        let b = FpPolynomial::<BLSScalar>::random(&mut prng, 6);
        let (q, r) = a.div_rem(&b).unwrap();
        assert!(r.degree() < b.degree());
        assert_eq!(q.mul(&b).add(&r), a);

        let zeroes = [BLSScalar::from(3u32), BLSScalar::from(7u32)];
        let z = FpPolynomial::from_zeroes(&zeroes);
        let (q, r) = q.mul(&z).div_rem(&z).unwrap();
        assert!(r.is_zero());
        assert_eq!(q.mul(&z).div_rem(&z).unwrap().0, q);

        assert!(a.div_rem(&FpPolynomial::zero()).is_err());
    }

    #[test]
    fn test_lagrange_interpolation() {
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let poly = FpPolynomial::<BLSScalar>::random(&mut prng, 3);
        let points: Vec<BLSScalar> = (0..4).map(|_| BLSScalar::random(&mut prng)).collect();
        let values: Vec<BLSScalar> = points.iter().map(|p| poly.eval(p)).collect();
        let interpolated = FpPolynomial::lagrange_interpolation(&points, &values).unwrap();
        assert_eq!(interpolated, poly);

        let duplicated = [points[0], points[0]];
        assert!(FpPolynomial::lagrange_interpolation(&duplicated, &values[..2]).is_err());
    }

    #[test]
    fn test_shift_and_mul() {
        let one = BLSScalar::one();
        let two = one + one;
        let p = FpPolynomial::from_coefs(vec![one, two]);
        let shifted = p.shift(3);
        assert_eq!(shifted.degree(), 4);
        let x = BLSScalar::from(5u32);
        assert_eq!(shifted.eval(&x), p.eval(&x) * x.pow(&[3]));
        assert_eq!(p.mul(&p).eval(&x), p.eval(&x).square());
        assert!(FpPolynomial::<BLSScalar>::zero().shift(4).is_zero());
    }
}
