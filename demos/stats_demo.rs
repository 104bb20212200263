use clap::Parser;
use clap::ValueEnum;
use linear_hash::KeyHasher;
use linear_hash::LinearTable;
use linear_hash::TableError;
use linear_hash::hash::ByteSum;
use linear_hash::hash::Djb2;
use linear_hash::hash::FoldHash;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    ByteSum,
    Djb2,
    Foldhash,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1000)]
    capacity: usize,

    /// Percentage of slots to fill before reporting.
    #[arg(short = 'l', long = "load", default_value_t = 90)]
    load_percent: usize,

    /// Percentage of inserted keys to delete afterwards, leaving tombstones.
    #[arg(short = 'd', long = "delete", default_value_t = 0)]
    delete_percent: usize,

    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Djb2)]
    strategy: Strategy,

    /// Print every slot after filling.
    #[arg(long)]
    dump: bool,
}

fn run<H: KeyHasher>(args: &Args, hasher: H) -> Result<(), TableError> {
    let target = (args.capacity * args.load_percent / 100).min(args.capacity);
    let keys = (0..args.capacity)
        .map(|i| format!("key_{i:08}"))
        .collect::<Vec<_>>();
    let values = (0..args.capacity as u64).collect::<Vec<_>>();

    println!(
        "Creating LinearTable with capacity {} using {:?}",
        args.capacity, args.strategy
    );
    let mut table = LinearTable::with_hasher(args.capacity, hasher)?;

    for (key, value) in keys.iter().zip(&values).take(target) {
        table.set(key, value)?;
    }
    println!("Inserted {} keys", table.len());

    let deletes = target * args.delete_percent.min(100) / 100;
    for key in keys.iter().step_by(2).chain(keys.iter().skip(1).step_by(2)) {
        if table.tombstones() >= deletes {
            break;
        }
        table.del(key);
    }
    println!(
        "Deleted {} keys, final load factor: {:.2}%",
        table.tombstones(),
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    if args.dump {
        table.print_dump();
    }
    table.probe_histogram().print();
    table.debug_stats().print();

    Ok(())
}

fn main() -> Result<(), TableError> {
    env_logger::init();
    let args = Args::parse();

    match args.strategy {
        Strategy::ByteSum => run(&args, ByteSum),
        Strategy::Djb2 => run(&args, Djb2),
        Strategy::Foldhash => run(&args, FoldHash::default()),
    }
}
