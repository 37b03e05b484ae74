//! The console driven over real HTTP against the mock server.

use inventory_app::{ApiClient, AppConfig, ProductModal, ToastLevel, UreqTransport, ViewController};
use inventory_core::ProductField;

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

fn console(api_url: String) -> ViewController<UreqTransport> {
    let config = AppConfig {
        api_url,
        ..AppConfig::default()
    };
    let api = ApiClient::from_config(&config, UreqTransport::new(config.timeout));
    ViewController::new(api, &config)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_edit_delete_round_trip() {
    let controller = console(start_server());
    assert!(controller.initialize().await);
    assert_eq!(controller.with_state(|s| s.categories.len()), 10);
    assert!(controller.with_state(|s| s.table.is_empty()));

    // create
    controller.new_product();
    controller.field_input(ProductField::Name, "Reading lamp");
    controller.field_input(ProductField::Description, "Clamp-on reading lamp");
    controller.field_input(ProductField::Price, "18.90");
    controller.field_input(ProductField::Stock, "4");
    controller.field_input(ProductField::Category, "Hogar");
    controller.submit_form().await;

    let state = controller.snapshot();
    assert_eq!(state.modal, ProductModal::Closed);
    assert_eq!(state.products.len(), 1);
    assert_eq!(state.table.rows[0].price, "18.90");
    let id = state.products[0].id.clone();

    // the same name again is refused and kept in the form
    controller.new_product();
    controller.field_input(ProductField::Name, "reading LAMP");
    controller.field_input(ProductField::Description, "Another clamp-on lamp");
    controller.field_input(ProductField::Price, "5");
    controller.field_input(ProductField::Stock, "1");
    controller.field_input(ProductField::Category, "Hogar");
    controller.submit_form().await;
    let state = controller.snapshot();
    assert!(state.modal.is_open());
    let toast = state.toasts.last().unwrap();
    assert_eq!(toast.level, ToastLevel::Warning);
    controller.close_product_modal();

    // edit stock to zero; the availability filter then finds it
    controller.edit_product(&id).await;
    controller.field_input(ProductField::Stock, "0");
    controller.submit_form().await;
    controller.set_availability_filter("false").await;
    let state = controller.snapshot();
    assert_eq!(state.products.len(), 1);
    assert_eq!(state.products[0].stock, 0);

    // delete
    controller.request_delete(id, "Reading lamp");
    controller.confirm_delete().await;
    let state = controller.snapshot();
    assert!(state.pending_delete.is_none());
    assert!(state.table.is_empty());

    let stats = controller.api().statistics().await.unwrap();
    assert_eq!(stats.total_products, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_fails_initialization() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let controller = console(format!("http://{addr}/api"));

    assert!(!controller.initialize().await);
    let toast = controller.with_state(|s| s.toasts.last().cloned()).unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert!(toast.message.contains("Cannot connect to the server"));
}
