use std::sync::Arc;

use igproto::{
    Camera, Endpoint, EndpointConfig, EntityState, Loopback, LosRequest, LosResponse, Message,
    Registry, Vec3d, Vec3f,
};

#[test]
fn host_and_ig_exchange_line_of_sight() {
    let registry = Arc::new(Registry::with_builtin());
    let (host_link, ig_link) = Loopback::pair();
    let config = EndpointConfig {
        stamp_frame_header: true,
        ..EndpointConfig::default()
    };
    let mut host = Endpoint::new(host_link, Arc::clone(&registry), config.clone()).unwrap();
    let mut ig = Endpoint::new(ig_link, Arc::clone(&registry), config).unwrap();

    // Host publishes the scene for this frame and asks a LOS question.
    let entity = EntityState::new(1, Vec3d::new(10.0, 20.0, 0.0), Vec3f::new(90.0, 0.0, 0.0));
    let camera = Camera::bound(1, Vec3d::new(0.0, -15.0, 4.0), Vec3f::default());
    let request = LosRequest::new(
        77,
        Vec3d::new(10.0, 20.0, 500.0),
        Vec3d::new(10.0, 20.0, -500.0),
    );
    let frame: [&dyn Message; 3] = [&entity, &camera, &request];
    host.send_batch(&frame).unwrap();

    // IG answers every LOS request it sees.
    let inbound = ig.poll().unwrap().unwrap();
    assert_eq!(inbound.len(), 4);
    let answers: Vec<LosResponse> = inbound
        .iter()
        .filter_map(|message| message.downcast_ref::<LosRequest>())
        .map(|request| {
            LosResponse::new(
                request.id,
                Vec3d::new(request.start.x, request.start.y, 0.0),
                Vec3f::new(0.0, 0.0, 1.0),
            )
        })
        .collect();
    assert_eq!(answers.len(), 1);
    ig.send(&answers[0]).unwrap();

    let replies = host.poll().unwrap().unwrap();
    let response = replies
        .iter()
        .find_map(|message| message.downcast_ref::<LosResponse>())
        .unwrap();
    assert_eq!(response.id, 77);
    assert_eq!(response.position, Vec3d::new(10.0, 20.0, 0.0));
    assert_eq!(registry.metrics().total_errors(), 0);
}

#[test]
fn garbage_datagram_does_not_poison_later_ones() {
    let registry = Arc::new(Registry::with_builtin());
    let (host_link, ig_link) = Loopback::pair();
    let mut host =
        Endpoint::new(host_link, Arc::clone(&registry), EndpointConfig::default()).unwrap();
    let mut ig = Endpoint::new(ig_link, registry, EndpointConfig::default()).unwrap();

    ig.transport_mut().inject(vec![0xFFu8; 32]).unwrap();
    host.send(&LosRequest::default()).unwrap();

    assert!(ig.poll().unwrap().unwrap().is_empty());
    assert_eq!(ig.discarded_bytes(), 32);

    let next = ig.poll().unwrap().unwrap();
    assert_eq!(next.len(), 1);
    assert!(next[0].is::<LosRequest>());
}
