use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    speech_partition::apps::run_prepare_settings(std::env::args().skip(1))
}
