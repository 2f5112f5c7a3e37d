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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Generate `sample_sales.csv`: a demo dataset with two strongly correlated
/// numeric columns (units vs revenue), one independent numeric column, and a
/// categorical region column, so every tab of the app has something to show.
fn main() {
    let mut rng = SimpleRng::new(42);

    let regions = ["North", "South", "East", "West"];
    let unit_price = 12.5;

    let path = "sample_sales.csv";
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer
        .write_record(["order_id", "region", "units", "revenue", "discount"])
        .expect("Failed to write header");

    let n_rows = 400;
    for order_id in 0..n_rows {
        let region = regions[(rng.next_u64() % regions.len() as u64) as usize];
        let units = (rng.gauss(50.0, 18.0).max(1.0)).round();
        // Revenue tracks units closely, with mild noise → correlation ≈ 0.95.
        let revenue = units * unit_price + rng.gauss(0.0, 60.0);
        let discount = (rng.next_f64() * 0.3 * 100.0).round() / 100.0;

        writer
            .write_record([
                order_id.to_string(),
                region.to_string(),
                format!("{units}"),
                format!("{revenue:.2}"),
                format!("{discount}"),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");
    println!("Wrote {n_rows} rows to {path}");
}
