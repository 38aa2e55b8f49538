use indexed_skiplist::SkipList;

use log::info;

fn main() {
    env_logger::init();

    let mut sk: SkipList<u32> = SkipList::with_seed(432112);

    let mut k = 50;
    while k > 0 {
        sk.insert(k);
        println!("{}", sk);
        k -= 1;
    }
    info!("{} elements over {} levels", sk.len(), sk.height());

    println!("rank 3: {:?}", sk.get_by_rank(3));
    println!("floor(0): {:?}, ceiling(51): {:?}", sk.floor(&0), sk.ceiling(&51));

    sk.rebuild();
    info!("rebuilt into {} levels", sk.height());

    let k: u32 = 3;
    println!("{:?}", sk.get(&k));
    println!("{:?}", sk.remove(&k));
    println!("{:?}", sk.get(&k));
    println!("rank 3: {:?}", sk.get_by_rank(3));
    println!("{}", sk);
}
