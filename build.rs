use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (unit and integration tests) need nothing from here
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    // Configure for ATmega128
    println!("cargo:rustc-link-arg=-mmcu=atmega128");

    if env::var("CARGO_FEATURE_MULTIPLEXED").is_ok() {
        println!("cargo:warning=Building multiplexed display variant");
    }
}
