fn main() {
    // Logging is initialized once the page config has been read
    storefront_ui::start();
}
