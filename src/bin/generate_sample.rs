use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xorshift64*)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Raw labels as they show up in real exports: separator noise, `nan`
/// placeholders and plain blanks included.
const LABELS: &[&str] = &[
    "Galaxy",
    "Galaxy; Spiral",
    "Star;Binary",
    "Star  Variable",
    "Nebula",
    "QSO",
    "nan",
    "NaN",
    "",
];

const TARGETS: &[&str] = &["M31", "M42", "NGC 1275", "Vega", "3C 273", "Crab", "Sirius B"];

const HEADER: [&str; 8] = [
    "obs_id",
    "target_name",
    "target_classification",
    "s_ra",
    "s_dec",
    "calib_level",
    "t_min",
    "t_exptime",
];

fn write_export(path: &Path, rng: &mut SimpleRng, first_id: usize, rows: usize, labeled: bool) -> Result<()> {
    let mut file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    writeln!(file, "# Observation export (synthetic)")?;
    writeln!(file, "# {rows} rows")?;

    let mut writer = csv::Writer::from_writer(file);
    let header: Vec<&str> = HEADER
        .iter()
        .copied()
        .filter(|h| labeled || *h != "target_classification")
        .collect();
    writer.write_record(&header)?;

    for i in 0..rows {
        let mut record = vec![format!("obs{:05}", first_id + i), rng.pick(TARGETS).to_string()];
        if labeled {
            record.push(rng.pick(LABELS).to_string());
        }
        record.push(format!("{:.5}", rng.range(0.0, 360.0)));
        record.push(format!("{:.5}", rng.range(-90.0, 90.0)));
        record.push(((rng.next_u64() % 4) as u8).to_string());
        record.push(format!("{:.4}", rng.range(58000.0, 60000.0)));
        record.push(format!("{:.1}", rng.range(10.0, 3600.0)));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let outputs = [
        ("sample_observations.csv", 0, 40, true),
        ("sample_observations_b.csv", 40, 25, true),
        ("sample_observations_unlabeled.csv", 65, 10, false),
    ];

    for (name, first_id, rows, labeled) in outputs {
        write_export(Path::new(name), &mut rng, first_id, rows, labeled)?;
        println!("Wrote {rows} observations to {name}");
    }
    Ok(())
}
