//! Highroller Simulator
//!
//! Plays a game repeatedly with a fixed strategy and reports the observed
//! return to player. With `--api` the session is loaded from and synced back
//! to a running server.

use clap::Parser;
use highroller::client::CasinoClient;
use highroller::common::now_millis;
use highroller::errors::{CasinoResult, GameError, RuleResult};
use highroller::games::{
    baccarat::{self, BaccaratBet},
    blackjack::BlackjackHand,
    classic_slots, progressive_slots,
    roulette::{RouletteBet, RouletteTable},
    video_poker::{simple_hold, PokerHand},
    video_slots::{VideoSlots, MAX_PAYLINES},
    GameTitle, RoundSummary,
};
use highroller::session::PlayerSession;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "highroller-sim")]
#[command(about = "Play a casino game with a fixed strategy and report RTP", long_about = None)]
struct Args {
    /// Game to play (classic-slots, video-slots, progressive-slots,
    /// blackjack, roulette, baccarat, video-poker)
    #[arg(long, default_value = "classic-slots")]
    game: GameTitle,

    /// Number of rounds
    #[arg(long, default_value = "1000")]
    rounds: u32,

    /// Stake per round (per line for video slots)
    #[arg(long, default_value = "10")]
    bet: i64,

    /// Active paylines for video slots
    #[arg(long, default_value_t = MAX_PAYLINES)]
    lines: u32,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Base URL of a running API server to sync with
    #[arg(long)]
    api: Option<String>,

    #[arg(long, default_value = "simulator")]
    username: String,

    #[arg(long, default_value = "simulator")]
    password: String,
}

/// Per-game machine state that outlives a single round
#[derive(Default)]
struct Floor {
    video_slots: VideoSlots,
    roulette: RouletteTable,
}

impl Floor {
    fn stake(&self, title: GameTitle, bet: i64, lines: u32) -> i64 {
        match title {
            GameTitle::VideoSlots => self.video_slots.stake(bet, lines),
            _ => bet,
        }
    }

    /// Play one round with the fixed strategy for `title`
    fn play<R: Rng>(
        &mut self,
        rng: &mut R,
        title: GameTitle,
        bet: i64,
        lines: u32,
        jackpot: i64,
    ) -> RuleResult<RoundSummary> {
        match title {
            GameTitle::ClassicSlots => Ok(classic_slots::play(rng, bet)?.summary),
            GameTitle::VideoSlots => Ok(self.video_slots.spin(rng, bet, lines)?.summary),
            GameTitle::ProgressiveSlots => Ok(progressive_slots::play(rng, bet, jackpot)?.summary),
            GameTitle::Blackjack => {
                let mut hand = BlackjackHand::deal(rng, bet)?;
                while !hand.is_finished() && hand.player_total() < 17 {
                    hand.hit()?;
                }
                if !hand.is_finished() {
                    hand.stand()?;
                }
                hand.summary().ok_or(GameError::HandFinished)
            }
            GameTitle::Roulette => {
                self.roulette.place(RouletteBet::Red, bet)?;
                Ok(self.roulette.spin(rng)?.summary)
            }
            GameTitle::Baccarat => Ok(baccarat::play(rng, BaccaratBet::Banker, bet)?.summary),
            GameTitle::VideoPoker => {
                let mut hand = PokerHand::deal(rng, bet)?;
                let held = simple_hold(hand.cards());
                let (_, summary) = hand.draw(held)?;
                Ok(summary)
            }
        }
    }
}

#[derive(Debug, Default)]
struct Report {
    rounds: u32,
    staked: i64,
    returned: i64,
    wins: u32,
    biggest_win: i64,
    jackpots: u32,
    unlocked: Vec<String>,
}

impl Report {
    fn record(&mut self, summary: &RoundSummary) {
        self.rounds += 1;
        self.staked += summary.bet;
        self.returned += summary.payout;
        if summary.is_win() {
            self.wins += 1;
        }
        self.biggest_win = self.biggest_win.max(summary.net_win());
        if summary.jackpot_won.is_some() {
            self.jackpots += 1;
        }
    }

    fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins as f64 / self.rounds as f64 * 100.0
        }
    }

    fn rtp(&self) -> f64 {
        if self.staked == 0 {
            0.0
        } else {
            self.returned as f64 / self.staked as f64 * 100.0
        }
    }
}

async fn open_session(client: &CasinoClient, username: &str, password: &str) -> CasinoResult<PlayerSession> {
    let user = match client.register(username, password).await {
        Ok(user) => user,
        Err(e) if e.status() == Some(409) => client.login(username, password).await?,
        Err(e) => return Err(e.into()),
    };
    let state = client.get_game_state(user.id).await?;
    info!(user_id = user.id, balance = user.balance, "Session loaded from API");
    Ok(PlayerSession::new(user, state))
}

/// Push a snapshot in the background. Each sync waits for the one before it
/// so snapshots land in play order; failures are logged by `sync_session`.
fn spawn_sync(
    client: CasinoClient,
    snapshot: PlayerSession,
    previous: Option<JoinHandle<()>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(previous) = previous {
            let _ = previous.await;
        }
        let _ = client.sync_session(&snapshot).await;
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    highroller::init_tracing("highroller=info");
    let args = Args::parse();

    let client = match &args.api {
        Some(url) => Some(CasinoClient::new(url)?),
        None => None,
    };
    let mut session = match &client {
        Some(client) => open_session(client, &args.username, &args.password).await?,
        None => PlayerSession::guest(now_millis()),
    };

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    if let Some(balance) = session.claim_daily_bonus(now_millis()) {
        info!(balance, "Daily bonus claimed");
    }

    println!("🎰 Simulating {} rounds of {}", args.rounds, args.game.display_name());
    println!("   Bet: {}  Starting balance: {}", args.bet, session.balance());

    let mut floor = Floor::default();
    let mut report = Report::default();
    let mut pending_sync: Option<JoinHandle<()>> = None;
    let start = Instant::now();

    for _ in 0..args.rounds {
        let stake = floor.stake(args.game, args.bet, args.lines);
        if let Err(e) = session.ensure_affordable(stake) {
            warn!("Stopping early: {}", e);
            break;
        }

        let summary = floor.play(&mut rng, args.game, args.bet, args.lines, session.jackpot())?;
        let outcome = session.settle(&summary, now_millis())?;
        report.record(&summary);
        report
            .unlocked
            .extend(outcome.unlocked.into_iter().map(|a| a.name));

        if let Some(client) = &client {
            pending_sync = Some(spawn_sync(client.clone(), session.clone(), pending_sync.take()));
        }
    }

    if let Some(sync) = pending_sync {
        if let Err(e) = sync.await {
            warn!("Final sync task failed: {}", e);
        }
    }

    let elapsed = start.elapsed();
    println!("\n📊 Results ({:.2?})", elapsed);
    println!("   Rounds played:  {}", report.rounds);
    println!("   Total staked:   {}", report.staked);
    println!("   Total returned: {}", report.returned);
    println!("   RTP:            {:.2}%", report.rtp());
    println!("   Winning rounds: {} ({:.1}%)", report.wins, report.win_rate());
    println!("   Biggest win:    {}", report.biggest_win);
    if args.game == GameTitle::ProgressiveSlots {
        println!("   Jackpots hit:   {}", report.jackpots);
        println!("   Pool now:       {}", session.jackpot());
    }
    println!("   Final balance:  {}", session.balance());
    if !report.unlocked.is_empty() {
        println!("🏆 Unlocked: {}", report.unlocked.join(", "));
    }

    if let Some(client) = &client {
        println!("✅ Synced to {}", client.base_url());
    }

    Ok(())
}
