mod app;
mod audio;
mod catalog;
mod config;
mod cursor;
mod error;
mod mpris;
mod runtime;
mod transport;
mod ui;

#[cfg(test)]
mod test_support;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
