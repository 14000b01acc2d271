//! Random Player Example
//!
//! Logs in, then answers every prompt at random: a random action each
//! turn and a random standing creature whenever a slot is asked for.
//!
//! Run two of these against a local server to watch a full battle:
//!
//! ```text
//! POKEBAT_USER=ash POKEBAT_PASSWORD=pikachu cargo run --example random_player
//! POKEBAT_USER=gary POKEBAT_PASSWORD=eevee cargo run --example random_player
//! ```

use anyhow::Result;
use async_trait::async_trait;
use pokebat_client::{BattleResult, Client, ClientConfig, Handler, RosterSlot, Sender};
use rand::Rng;
use rand::seq::SliceRandom;

/// Chance of giving up on any given turn
const SURRENDER_CHANCE: f64 = 0.02;

struct RandomPlayer {
    sender: Sender,
    turns: u32,
}

#[async_trait]
impl Handler for RandomPlayer {
    async fn on_authenticated(&mut self) {
        println!("Logged in, waiting for a battle...");
    }

    async fn on_auth_failed(&mut self) {
        println!("Login failed");
    }

    async fn on_turn_prompt(&mut self) {
        self.turns += 1;

        let action = {
            let mut rng = rand::thread_rng();
            if rng.gen_bool(SURRENDER_CHANCE) {
                "surrender"
            } else if rng.gen_bool(0.2) {
                "switch"
            } else {
                "attack"
            }
        };

        println!("[turn {}] {}", self.turns, action);
        self.sender.send_raw(action).await.ok();
    }

    async fn on_selection_prompt(&mut self, roster: &[RosterSlot]) {
        let choice = {
            let standing: Vec<&RosterSlot> = roster.iter().filter(|s| s.is_selectable()).collect();
            standing.choose(&mut rand::thread_rng()).map(|s| s.slot)
        };

        match choice {
            Some(slot) => {
                println!("Picking slot {}", slot);
                self.sender.select(slot).await.ok();
            }
            None => println!("Nothing to pick from"),
        }
    }

    async fn on_battle_over(&mut self, result: BattleResult) {
        let text = match result {
            BattleResult::Won => "won",
            BattleResult::Lost => "lost",
            BattleResult::Aborted => "was aborted",
        };
        println!("Battle {} after {} turns", text, self.turns);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    println!("Random Player");
    println!("=============");

    let config = ClientConfig::from_env();
    let username = config.username.unwrap_or_else(|| "ash".to_string());
    let password = config.password.unwrap_or_else(|| "pikachu".to_string());

    println!("Connecting to {}...", config.addr);
    let mut client = Client::connect(&config.addr).await?;
    println!("Connected!");

    let mut player = RandomPlayer {
        sender: client.sender(),
        turns: 0,
    };
    player.sender.login(&username, &password).await?;

    client.run(&mut player).await?;
    Ok(())
}
