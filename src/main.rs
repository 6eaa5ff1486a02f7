mod actors;
mod app;
mod assets;
mod audio;
mod config;
mod pixel;
mod render;
mod systems;
mod ui;
mod world;

use crate::config::window_conf;

#[macroquad::main(window_conf)]
// 程序入口：初始化日志与窗口配置并启动游戏主循环
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    app::run().await;
}
