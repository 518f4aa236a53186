fn main() {
    println!("cargo:rerun-if-env-changed=CHAMBERCTL_CONFIG_JSON");

    // ESP-IDF link/env plumbing is only needed for the firmware build; host
    // test builds run without the `espidf` feature.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
