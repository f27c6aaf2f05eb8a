use chrono::NaiveDate;
use packet_core::{
    create_job_packet_request, create_job_packet_request_with, ping_request, CallerError,
    Envelope, JobFields, MemorySettings, PacketOptions, Request, BASE_FOLDER_KEY,
};

fn fields() -> JobFields {
    JobFields {
        title: "Engineer".into(),
        company: "Acme".into(),
        location: Some("Remote".into()),
        description_html: "<p>Hi</p>".into(),
        source_url: "https://jobs.example.com/1".into(),
        captured_at_iso: "2024-05-01T10:00:00Z".into(),
        ..Default::default()
    }
}

#[test]
fn request_ids_are_unique_uuids() {
    let a = ping_request();
    let b = ping_request();
    assert_ne!(a.request_id, b.request_id);
    assert_eq!(a.request_id.len(), 36);
}

#[test]
fn packet_request_needs_base_folder() {
    let settings = MemorySettings::new();
    assert_eq!(
        create_job_packet_request(&fields(), &settings),
        Err(CallerError::BaseFolderNotConfigured)
    );

    let mut settings = MemorySettings::new();
    settings.set(BASE_FOLDER_KEY, "  ");
    assert!(create_job_packet_request(&fields(), &settings).is_err());
}

#[test]
fn packet_request_round_trips_through_the_wire_format() {
    let mut settings = MemorySettings::new();
    settings.set(BASE_FOLDER_KEY, "/home/me/jobs");
    let envelope = create_job_packet_request(&fields(), &settings).unwrap();

    let json = serde_json::to_string(&envelope).unwrap();
    assert!(json.contains(r#""kind":"CreateJobPacket""#));
    assert!(json.contains(r#""baseFolder":"/home/me/jobs""#));
    assert!(!json.contains("folderName"));

    let decoded = Envelope::parse(&json).unwrap();
    assert_eq!(decoded, envelope);
    let Request::CreateJobPacket(payload) = decoded.request else {
        panic!("expected a packet request");
    };
    assert_eq!(payload.location.as_deref(), Some("Remote"));
}

#[test]
fn extension_style_request_names_folder_and_pdf() {
    let mut settings = MemorySettings::new();
    settings.set(BASE_FOLDER_KEY, "/home/me/jobs");
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let envelope =
        create_job_packet_request_with(&fields(), &settings, PacketOptions::dated(date, &fields()))
            .unwrap();

    let Request::CreateJobPacket(payload) = envelope.request else {
        panic!("expected a packet request");
    };
    assert_eq!(payload.folder_name.as_deref(), Some("2024-05-01 Acme - Engineer"));
    assert_eq!(payload.pdf_file_name.as_deref(), Some("ad.pdf"));
}
