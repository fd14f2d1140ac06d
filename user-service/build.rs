fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::env::set_var("PROTOC", protobuf_src::protoc());
    // Serde derives let the gateway serialize proto messages as JSON
    // bodies without a parallel set of DTO types.
    tonic_build::configure()
        .type_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")
        .compile_protos(&["../proto/user.proto"], &["../proto"])?;
    Ok(())
}
