//! Line-of-sight request/response over an in-memory link

use std::sync::Arc;

use igproto::{
    Endpoint, EndpointConfig, Loopback, LosRequest, LosResponse, Registry, Vec3d, Vec3f,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("IG LOS Round-Trip Example");
    println!("=========================\n");

    let registry = Arc::new(Registry::with_builtin());
    let (host_link, ig_link) = Loopback::pair();
    let mut host = Endpoint::new(host_link, Arc::clone(&registry), EndpointConfig::default())?;
    let mut ig = Endpoint::new(ig_link, Arc::clone(&registry), EndpointConfig::default())?;

    // Host asks whether a vertical ray hits the ground
    let request = LosRequest::new(
        42,
        Vec3d::new(100.0, 200.0, 1000.0),
        Vec3d::new(100.0, 200.0, -1000.0),
    );
    let sent = host.send(&request)?;
    println!("Host sent LOS request id={} ({sent} bytes)", request.id);

    // IG answers with a flat-ground hit
    for message in ig.poll()?.unwrap_or_default() {
        if let Some(request) = message.downcast_ref::<LosRequest>() {
            let response = LosResponse::new(
                request.id,
                Vec3d::new(request.start.x, request.start.y, 5.0),
                Vec3f::new(0.0, 0.0, 1.0),
            );
            let sent = ig.send(&response)?;
            println!("IG answered id={} ({sent} bytes)", response.id);
        }
    }

    for message in host.poll()?.unwrap_or_default() {
        if let Some(response) = message.downcast_ref::<LosResponse>() {
            println!(
                "Host got hit id={} at ({}, {}, {}) normal ({}, {}, {})",
                response.id,
                response.position.x,
                response.position.y,
                response.position.z,
                response.normal.x,
                response.normal.y,
                response.normal.z,
            );
        }
    }

    println!("\nDecode metrics: {:?}", registry.metrics());
    Ok(())
}
