use skipset::{OrderedSkipSet, SkipListCursor};
use tracing_subscriber::EnvFilter;

fn main() -> skipset::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut list: OrderedSkipSet<i32> = OrderedSkipSet::new();
    list.insert(6);
    list.insert(6);
    list.remove(&6);
    println!("After removing 6, list.contains(6) is {}", list.contains(&6));

    for value in [6, 7, 2, 10, 16] {
        list.insert(value);
    }
    println!("{:?} (size {})", list, list.size());

    list.remove(&10);
    list.remove(&11);
    list.remove(&17);
    println!("{:?} (length {})", list, list.length());
    println!("get(0) = {}, get(3) = {}", list.get(0)?, list.get(3)?);
    if let Err(err) = list.get(4) {
        println!("get(4) failed: {err}");
    }

    let mut cursor = list.cursor();
    cursor.seek(&3);
    println!("first element >= 3 is {}", cursor.key()?);

    print!("{list}");
    Ok(())
}
