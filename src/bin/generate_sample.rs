use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const COLUMNS: [&str; 9] = [
    "CLIENT ID",
    "Supplier",
    "Pick Up Status (Done / Not Done)",
    "Transfer Activated (Yes / No)",
    "Documents Created (Invoice and Packing List)",
    "Payment Received (Yes / No)",
    "MRN Created (Yes / No)",
    "Quantity Sent",
    "Quantity Confirmed",
];

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

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[(self.next_u64() % choices.len() as u64) as usize]
    }

    /// `None` with probability `p`, to leave holes in the sheet.
    fn maybe<T>(&mut self, p: f64, value: T) -> Option<T> {
        if self.next_f64() < p {
            None
        } else {
            Some(value)
        }
    }
}

/// One generated order; `None` is a missing cell.
struct Order {
    text: [Option<String>; 7],
    sent: Option<i64>,
    confirmed: Option<i64>,
}

fn generate_orders(rng: &mut SimpleRng, n: usize) -> Vec<Order> {
    let clients = ["LX-1001", "LX-1002", "LX-1003", "LX-1004", "LX-1005"];
    let suppliers = ["Atelier Nord", "Pelletteria Sud", "Maison Ouest"];
    let yes_no = ["Yes", "No"];
    let documents = ["Yes", "No", "Invoice only"];

    (0..n)
        .map(|_| {
            let mut text: [Option<String>; 7] = [
                Some(rng.pick(&clients).to_string()),
                Some(rng.pick(&suppliers).to_string()),
                Some(rng.pick(&["Done", "Not Done"]).to_string()),
                Some(rng.pick(&yes_no).to_string()),
                Some(rng.pick(&documents).to_string()),
                Some(rng.pick(&yes_no).to_string()),
                Some(rng.pick(&yes_no).to_string()),
            ];
            // Client, pick up and transfer may be blank in the real sheet.
            for (col, p) in [(0, 0.03), (2, 0.08), (3, 0.1)] {
                if rng.next_f64() < p {
                    text[col] = None;
                }
            }

            let sent = (rng.next_u64() % 200 + 10) as i64;
            let shortfall = (rng.next_u64() % 5) as i64;
            let confirmed = rng.maybe(0.15, sent - shortfall);

            Order {
                text,
                sent: Some(sent),
                confirmed,
            }
        })
        .collect()
}

fn write_csv(path: &str, orders: &[Order]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(COLUMNS)?;
    for order in orders {
        let mut record: Vec<String> = order
            .text
            .iter()
            .map(|v| v.clone().unwrap_or_default())
            .collect();
        record.push(order.sent.map(|v| v.to_string()).unwrap_or_default());
        record.push(order.confirmed.map(|v| v.to_string()).unwrap_or_default());
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, orders: &[Order]) -> Result<()> {
    let mut fields: Vec<Field> = COLUMNS[..7]
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    fields.push(Field::new(COLUMNS[7], DataType::Int64, true));
    fields.push(Field::new(COLUMNS[8], DataType::Int64, true));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = (0..7)
        .map(|col| {
            let values: Vec<Option<&str>> =
                orders.iter().map(|o| o.text[col].as_deref()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();
    arrays.push(Arc::new(Int64Array::from(
        orders.iter().map(|o| o.sent).collect::<Vec<_>>(),
    )));
    arrays.push(Arc::new(Int64Array::from(
        orders.iter().map(|o| o.confirmed).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let orders = generate_orders(&mut rng, 60);

    write_csv("sample_orders.csv", &orders)?;
    write_parquet("sample_orders.parquet", &orders)?;

    println!(
        "Wrote {} orders to sample_orders.csv and sample_orders.parquet",
        orders.len()
    );
    Ok(())
}
