use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;

const EPSILON_0: f64 = 8.854187817e-12;
const BOLTZMANN_EV: f64 = 8.617333262e-5;

/// Sample geometry the generated capacitances correspond to.
const THICKNESS_M: f64 = 0.001;
const DIAMETER_M: f64 = 0.010;

include!("../data/headers.rs");

/// Single Debye relaxation with an Arrhenius relaxation time.
struct Debye {
    eps_inf: f64,
    delta_eps: f64,
    tau0: f64,
    activation_ev: f64,
}

impl Debye {
    /// (ε′, ε″) at frequency `f` and temperature `t_c`.
    fn permittivity(&self, f: f64, t_c: f64) -> (f64, f64) {
        let tau = self.tau0 * (self.activation_ev / (BOLTZMANN_EV * (t_c + 273.15))).exp();
        let wt = 2.0 * PI * f * tau;
        let denom = 1.0 + wt * wt;
        (
            self.eps_inf + self.delta_eps / denom,
            self.delta_eps * wt / denom,
        )
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Multiplicative noise around 1 with the given relative spread.
    fn jitter(&mut self, spread: f64) -> f64 {
        let u = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        1.0 + spread * (2.0 * u - 1.0)
    }
}

/// One measurement as the instruments report it.
struct Reading {
    f: f64,
    c: f64,
    d: f64,
}

impl Reading {
    fn new(model: &Debye, f: f64, t_c: f64, rng: &mut SimpleRng) -> Self {
        let (eps1, eps2) = model.permittivity(f, t_c);
        let area = PI * (DIAMETER_M / 2.0).powi(2);
        let c = eps1 * EPSILON_0 * area / THICKNESS_M * rng.jitter(0.002);
        let d = eps2 / eps1 * rng.jitter(0.01);
        Self { f, c, d }
    }

    fn omega(&self) -> f64 {
        2.0 * PI * self.f
    }

    /// Parallel-equivalent conductance, S.
    fn g(&self) -> f64 {
        self.omega() * self.c * self.d
    }

    /// Susceptance, S.
    fn b(&self) -> f64 {
        self.omega() * self.c
    }

    fn z(&self) -> f64 {
        1.0 / self.g().hypot(self.b())
    }

    fn phase_deg(&self) -> f64 {
        -(self.b().atan2(self.g())).to_degrees()
    }

    fn e7_30_row(&self) -> Vec<String> {
        let r = self.g() / (self.g().powi(2) + self.b().powi(2));
        let x = -self.b() / (self.g().powi(2) + self.b().powi(2));
        vec![
            format!("{}", self.f),
            format!("{:.5E}", self.c),
            format!("{:.5E}", -1.0 / (self.omega() * self.b())),
            format!("{r:.5E}"),
            format!("{:.5E}", self.g()),
            format!("{:.5E}", self.b()),
            format!("{x:.5E}"),
            format!("{:.5E}", self.z()),
            format!("{:.5}", self.d),
            format!("{:.3}", 1.0 / self.d),
            format!("{:.3}", self.phase_deg()),
            "0".to_string(),
        ]
    }

    /// The Vector meter writes decimal commas.
    fn vector_row(&self) -> Vec<String> {
        let comma = |s: String| s.replace('.', ",");
        vec![
            comma(format!("{}", self.f)),
            comma(format!("{:.3}", 1.0 / self.d)),
            comma(format!("{:.5}", self.d)),
            comma(format!("{:.5E}", self.z())),
            comma(format!("{:.3}", self.phase_deg())),
            comma(format!("{:.5E}", -1.0 / (self.omega() * self.b()))),
            comma(format!("{:.5E}", self.c)),
            comma(format!("{:.5E}", 1.0 / self.g())),
        ]
    }
}

fn write_export(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out_dir = Path::new("sample_data");
    std::fs::create_dir_all(out_dir).context("creating sample_data/")?;

    let model = Debye {
        eps_inf: 3.2,
        delta_eps: 4.5,
        tau0: 1e-13,
        activation_ev: 0.45,
    };
    let frequencies = [25.0, 100.0, 1_000.0, 10_000.0, 27_900.0, 100_000.0, 1_000_000.0];
    let temperatures = [-20.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

    let mut written = 0;
    for &t in &temperatures {
        let readings: Vec<Reading> = frequencies
            .iter()
            .map(|&f| Reading::new(&model, f, t, &mut rng))
            .collect();

        let e7_rows: Vec<Vec<String>> = readings.iter().map(Reading::e7_30_row).collect();
        let e7_path = out_dir.join(format!("E7-30___{t}___run1.txt"));
        write_export(&e7_path, &E7_30_HEADERS, &e7_rows)?;

        let vector_rows: Vec<Vec<String>> = readings.iter().map(Reading::vector_row).collect();
        let vector_path = out_dir.join(format!("Vector___{t}___run1.txt"));
        write_export(&vector_path, &VECTOR_HEADERS, &vector_rows)?;

        written += 2;
    }

    println!(
        "Wrote {written} exports ({} frequencies each) to {}",
        frequencies.len(),
        out_dir.display()
    );
    Ok(())
}
