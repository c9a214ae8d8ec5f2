use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SpectrogramError};

const BLACKMAN_ALPHA: f64 = 0.16;
const GAUSS_ALPHA: f64 = 0.25;

/// Taper applied to each analysis frame before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowKind {
    Bartlett,
    BartlettHann,
    Blackman,
    Cosine,
    Gauss,
    Hamming,
    #[default]
    Hann,
    Lanczos,
    Rectangular,
    Triangular,
}

impl WindowKind {
    pub const ALL: [WindowKind; 10] = [
        WindowKind::Bartlett,
        WindowKind::BartlettHann,
        WindowKind::Blackman,
        WindowKind::Cosine,
        WindowKind::Gauss,
        WindowKind::Hamming,
        WindowKind::Hann,
        WindowKind::Lanczos,
        WindowKind::Rectangular,
        WindowKind::Triangular,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Bartlett => "bartlett",
            WindowKind::BartlettHann => "bartlettHann",
            WindowKind::Blackman => "blackman",
            WindowKind::Cosine => "cosine",
            WindowKind::Gauss => "gauss",
            WindowKind::Hamming => "hamming",
            WindowKind::Hann => "hann",
            WindowKind::Lanczos => "lanczos",
            WindowKind::Rectangular => "rectangular",
            WindowKind::Triangular => "triangular",
        }
    }

    /// Default alpha for the kinds that take one.
    pub fn default_alpha(&self) -> Option<f64> {
        match self {
            WindowKind::Blackman => Some(BLACKMAN_ALPHA),
            WindowKind::Gauss => Some(GAUSS_ALPHA),
            _ => None,
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept camelCase, snake_case and kebab-case spellings.
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        let kind = match folded.as_str() {
            "bartlett" => WindowKind::Bartlett,
            "bartletthann" => WindowKind::BartlettHann,
            "blackman" => WindowKind::Blackman,
            "cosine" => WindowKind::Cosine,
            "gauss" => WindowKind::Gauss,
            "hamming" => WindowKind::Hamming,
            "hann" => WindowKind::Hann,
            "lanczos" | "lanczoz" => WindowKind::Lanczos,
            "rectangular" => WindowKind::Rectangular,
            "triangular" => WindowKind::Triangular,
            _ => return Err(SpectrogramError::config(format!("no such window function '{}'", s))),
        };
        Ok(kind)
    }
}

/// Window kind plus its optional shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowSpec {
    pub kind: WindowKind,
    /// Only read by `Blackman` and `Gauss`.
    pub alpha: Option<f64>,
}

impl WindowSpec {
    pub fn new(kind: WindowKind) -> Self {
        Self { kind, alpha: None }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Parse a window name; `None` selects the default (hann).
    pub fn parse(name: Option<&str>, alpha: Option<f64>) -> Result<Self> {
        let kind = match name {
            Some(n) => n.parse()?,
            None => WindowKind::default(),
        };
        let spec = Self { kind, alpha };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kind.default_alpha().is_none() {
            return Ok(());
        }
        match self.alpha {
            Some(a) if !(a > 0.0 && a < 1.0) => Err(SpectrogramError::config(format!(
                "alpha for {} window must lie in (0, 1), got {}",
                self.kind, a
            ))),
            _ => Ok(()),
        }
    }

    pub fn effective_alpha(&self) -> Option<f64> {
        self.kind.default_alpha().map(|d| self.alpha.unwrap_or(d))
    }

    pub fn generate(&self, length: usize) -> Vec<f64> {
        generate(self.kind, length, self.alpha)
    }
}

/// Window coefficients of `length` samples.
pub fn generate(kind: WindowKind, length: usize, alpha: Option<f64>) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length];
    }

    let n = length as f64;
    let m = n - 1.0;
    let half = m / 2.0;

    (0..length)
        .map(|i| {
            let x = i as f64;
            match kind {
                WindowKind::Bartlett => 2.0 / m * (half - (x - half).abs()),
                WindowKind::BartlettHann => {
                    0.62 - 0.48 * (x / m - 0.5).abs() - 0.38 * (2.0 * PI * x / m).cos()
                }
                WindowKind::Blackman => {
                    let a = alpha.unwrap_or(BLACKMAN_ALPHA);
                    (1.0 - a) / 2.0 - 0.5 * (2.0 * PI * x / m).cos()
                        + a / 2.0 * (4.0 * PI * x / m).cos()
                }
                WindowKind::Cosine => (PI * x / m - PI / 2.0).cos(),
                WindowKind::Gauss => {
                    let a = alpha.unwrap_or(GAUSS_ALPHA);
                    (-0.5 * ((x - half) / (a * m / 2.0)).powi(2)).exp()
                }
                WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * x / m).cos(),
                WindowKind::Hann => 0.5 * (1.0 - (2.0 * PI * x / m).cos()),
                WindowKind::Lanczos => sinc(2.0 * x / m - 1.0),
                WindowKind::Rectangular => 1.0,
                WindowKind::Triangular => 2.0 / n * (n / 2.0 - (x - half).abs()),
            }
        })
        .collect()
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_requested_length() {
        for kind in WindowKind::ALL {
            for len in [2, 7, 64, 512] {
                assert_eq!(generate(kind, len, None).len(), len, "{}", kind);
            }
        }
    }

    #[test]
    fn rectangular_is_all_ones() {
        assert!(generate(WindowKind::Rectangular, 128, None)
            .iter()
            .all(|&w| w == 1.0));
    }

    #[test]
    fn hann_is_zero_at_edges() {
        let w = WindowSpec::default().generate(256);
        assert!(w[0].abs() < 1e-12);
        assert!(w[255].abs() < 1e-12);
        let peak = w.iter().cloned().fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-3);
    }

    #[test]
    fn windows_are_symmetric() {
        for kind in WindowKind::ALL {
            let w = generate(kind, 64, None);
            for i in 0..32 {
                assert!((w[i] - w[63 - i]).abs() < 1e-9, "{} at {}", kind, i);
            }
        }
    }

    #[test]
    fn blackman_uses_alpha() {
        let default = generate(WindowKind::Blackman, 32, None);
        let explicit = generate(WindowKind::Blackman, 32, Some(0.16));
        let other = generate(WindowKind::Blackman, 32, Some(0.5));
        assert_eq!(default, explicit);
        assert_ne!(default, other);
        // (1 - a) / 2 - 0.5 + a / 2 at the first sample
        assert!(default[0].abs() < 1e-12);
    }

    #[test]
    fn gauss_peaks_in_the_middle() {
        let w = generate(WindowKind::Gauss, 65, Some(0.25));
        assert!((w[32] - 1.0).abs() < 1e-12);
        assert!(w[0] < 0.001);
    }

    #[test]
    fn lanczos_handles_center_sample() {
        let w = generate(WindowKind::Lanczos, 5, None);
        assert_eq!(w[2], 1.0);
        assert!(w[0].abs() < 1e-12);
    }

    #[test]
    fn degenerate_lengths() {
        assert!(generate(WindowKind::Hann, 0, None).is_empty());
        assert_eq!(generate(WindowKind::Hann, 1, None), vec![1.0]);
    }

    #[test]
    fn parses_names() {
        assert_eq!("bartlettHann".parse::<WindowKind>().unwrap(), WindowKind::BartlettHann);
        assert_eq!("bartlett_hann".parse::<WindowKind>().unwrap(), WindowKind::BartlettHann);
        assert_eq!("lanczoz".parse::<WindowKind>().unwrap(), WindowKind::Lanczos);
        for kind in WindowKind::ALL {
            assert_eq!(kind.name().parse::<WindowKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_name_is_configuration_error() {
        let err = "kaiser".parse::<WindowKind>().unwrap_err();
        assert!(matches!(err, SpectrogramError::Configuration(_)));
    }

    #[test]
    fn missing_name_defaults_to_hann() {
        let spec = WindowSpec::parse(None, None).unwrap();
        assert_eq!(spec.kind, WindowKind::Hann);
    }

    #[test]
    fn alpha_out_of_range_is_rejected() {
        assert!(WindowSpec::parse(Some("gauss"), Some(1.5)).is_err());
        assert!(WindowSpec::parse(Some("blackman"), Some(0.0)).is_err());
        // ignored by kinds without alpha
        assert!(WindowSpec::parse(Some("hann"), Some(3.0)).is_ok());
        assert_eq!(WindowSpec::new(WindowKind::Gauss).effective_alpha(), Some(0.25));
    }
}
