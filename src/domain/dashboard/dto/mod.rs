pub mod dashboard_view_request;
