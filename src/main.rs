use ldcouple::settings::{self};
use ldcouple::sweep::MultiSweep;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = settings::load_config()?;
    println!("{}", settings);

    let mut multisweep = MultiSweep::new(settings)?;

    multisweep.solve();
    println!("{}", multisweep.summary());
    multisweep.writeup()
}
