//! Contract tests for the REST repositories against a mock backend.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/clientes` | `list_*` |
//! | POST   | `/clientes`, `/ventas` | `create_*` |
//! | PUT    | `/productos/{id}` | `update_*` |
//! | DELETE | `/clientes/{id}` | `remove_*` |
//! | GET    | `/reportes` | `report_*` |

use deli_api::config::ApiSettings;
use deli_api::{ApiClient, ApiError, MutationAck};
use deli_core::{Customer, CustomerPayload, Entity, Money, Product, ProductPayload, ProductStatus, Sale, SaleDraft};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client whose base URL points at the mock server's `/api`.
fn test_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiSettings {
        base_url: format!("{}/api", server.uri()),
        timeout_secs: 5,
    })
    .unwrap()
}

fn ana_json(id: i64) -> serde_json::Value {
    json!({
        "id_cliente": id,
        "nombre": "Ana Torres",
        "telefono": "987654321",
        "correo": "ana@mail.com",
        "direccion": "Av. Lima 123"
    })
}

// ── GET /clientes ────────────────────────────────────────────────────

#[tokio::test]
async fn list_decodes_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ana_json(1),
            {"id_cliente": 2, "nombre": "Luis Pérez", "telefono": "912345678", "correo": null, "direccion": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let customers = test_client(&server).repository::<Customer>().list().await.unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[1].correo, "");
}

#[tokio::test]
async fn list_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = test_client(&server).repository::<Customer>().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn list_reports_bad_json_as_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).repository::<Customer>().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn list_unreachable_backend_is_transport_error() {
    let client = ApiClient::new(&ApiSettings {
        base_url: "http://127.0.0.1:9/api".to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    let err = client.repository::<Customer>().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
}

// ── Cache ────────────────────────────────────────────────────────────

#[tokio::test]
async fn cached_list_is_fetched_once_until_a_mutation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ana_json(1)])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/clientes/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let repo = test_client(&server).repository::<Customer>();
    repo.cached().await.unwrap();
    repo.cached().await.unwrap();

    repo.remove(1).await.unwrap();
    repo.cached().await.unwrap();
}

#[tokio::test]
async fn list_answer_older_than_a_mutation_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([ana_json(1)]))
                .set_delay(std::time::Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/clientes/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let repo = client.repository::<Customer>();

    // The delete is sent and acknowledged while the list is still waiting.
    let (listed, removed) = tokio::join!(repo.list(), repo.remove(1));
    assert_eq!(listed.unwrap().len(), 1);
    removed.unwrap();

    assert!(client.cache().get::<Vec<Customer>>("clientes").await.is_none());
}

// ── POST ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_sends_exactly_the_form_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/clientes"))
        .and(body_json(json!({
            "nombre": "Ana Torres",
            "telefono": "987654321",
            "correo": "ana@mail.com",
            "direccion": "Av. Lima 123"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(ana_json(12)))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CustomerPayload {
        nombre: "Ana Torres".into(),
        telefono: "987654321".into(),
        correo: "ana@mail.com".into(),
        direccion: "Av. Lima 123".into(),
    };

    let ack = test_client(&server)
        .repository::<Customer>()
        .create(&payload)
        .await
        .unwrap();
    assert_eq!(ack.into_record().map(|c| c.id()), Some(12));
}

#[tokio::test]
async fn create_with_message_body_is_acknowledged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/ventas"))
        .and(body_partial_json(json!({"id_cliente": 3, "total": 25})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "Venta registrada"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = SaleDraft::new();
    draft.select_customer(Some(3));
    draft.add_line(Some(1), 2, Money::from_cents(1000)).unwrap();
    draft.add_line(Some(2), 1, Money::from_cents(500)).unwrap();
    let payload = Sale::to_payload(&draft).unwrap();

    let ack = test_client(&server)
        .repository::<Sale>()
        .create(&payload)
        .await
        .unwrap();
    assert_eq!(ack, MutationAck::Acknowledged);
}

#[tokio::test]
async fn create_rejected_by_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/clientes"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "correo ya registrado"})),
        )
        .mount(&server)
        .await;

    let payload = CustomerPayload {
        nombre: "Ana Torres".into(),
        telefono: "987654321".into(),
        correo: "ana@mail.com".into(),
        direccion: String::new(),
    };

    let err = test_client(&server)
        .repository::<Customer>()
        .create(&payload)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Rejected { status: 422, ref message, .. } if message == "correo ya registrado"
    ));
}

// ── PUT ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_puts_full_record_to_id_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/productos/4"))
        .and(body_json(json!({
            "nombre": "Queso edam",
            "categoria": "Quesos",
            "precio_venta": 12.5,
            "estado": "Inactivo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_producto": 4,
            "nombre": "Queso edam",
            "categoria": "Quesos",
            "precio_venta": "12.50",
            "estado": "Inactivo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = ProductPayload {
        nombre: "Queso edam".into(),
        categoria: "Quesos".into(),
        precio_venta: Money::from_cents(1250),
        estado: ProductStatus::Inactive,
    };

    let product = test_client(&server)
        .repository::<Product>()
        .update(4, &payload)
        .await
        .unwrap()
        .into_record()
        .unwrap();
    assert_eq!(product.precio_venta, Money::from_cents(1250));
}

// ── DELETE ───────────────────────────────────────────────────────────

#[tokio::test]
async fn remove_unknown_id_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/clientes/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Cliente no encontrado"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server)
        .repository::<Customer>()
        .remove(999)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ── GET /reportes ────────────────────────────────────────────────────

#[tokio::test]
async fn report_shortens_month_labels() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ingresos": "25000.00",
            "egresos": "9000.00",
            "utilidad": "16000.00",
            "ventasMensuales": [{"mes": "Mayo", "total": "19500"}, {"mes": "Junio", "total": "25000"}],
            "comprasMensuales": [],
            "productos": [{"producto": "Salame", "total_vendido": 18}],
            "clientes": []
        })))
        .mount(&server)
        .await;

    let report = test_client(&server).report().await.unwrap();
    assert_eq!(report.utilidad, Money::from_cents(1_600_000));
    assert_eq!(report.ventas_mensuales[0].mes, "May");
    assert_eq!(report.forecast_series()[1].mes, "Jun");
}
