use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    speech_partition::apps::run_split_report(std::env::args().skip(1))
}
