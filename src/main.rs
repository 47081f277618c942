fn main() {
    goldrush::config::load_dotenv();
    goldrush::logging::init();
    dioxus::launch(goldrush::ui::App);
}
