use shadow_rs::ShadowBuilder;

fn main() {
    // Embedded migrations and the bundled seed dataset are compiled into the binary.
    println!("cargo:rerun-if-changed=migrations");
    println!("cargo:rerun-if-changed=seed/seed-data.json");

    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
