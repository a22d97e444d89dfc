//! Berty Link CLI
//!
//! Thin wrapper around bertylink-core for command-line usage.
//!
//! ## Usage
//!
//! ```bash
//! # Create links for a contact invite
//! bertylink contact --account-pk 01020304 --rendezvous-seed aabbcc --name Alice
//!
//! # Same, and draw the internal link as a QR code
//! bertylink contact --account-pk 01020304 --rendezvous-seed aabbcc --qr
//!
//! # Create links for a multi-member group
//! bertylink group --public-key 11.. --secret 22.. --secret-sig 33.. --sign-pub 44..
//!
//! # Decode any link
//! bertylink decode 'https://berty.tech/id#contact/...'
//! bertylink decode 'BERTY://PB/...' --json
//! ```

use anyhow::Result;
use bertylink_core::{
    unmarshal, BertyGroup, BertyId, Group, GroupType, LinkRecord, MarshaledLink,
};
use clap::{Parser, Subcommand};
use qrcode::render::unicode;
use qrcode::QrCode;
use serde::Serialize;
use tracing::{debug, info};

/// Berty Link - encode and decode shareable invite links
#[derive(Parser)]
#[command(name = "bertylink")]
#[command(version = "0.1.0")]
#[command(about = "Berty Link - encode and decode shareable invite links")]
#[command(
    long_about = "Builds the web and QR links for contact and group invites, and decodes links back into their records."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create links for a contact invite
    Contact {
        /// Account public key (hex)
        #[arg(long)]
        account_pk: String,
        /// Public rendezvous seed (hex)
        #[arg(long)]
        rendezvous_seed: String,
        /// Display name shown to the invitee
        #[arg(short, long)]
        name: Option<String>,
        /// Also print the internal link as a QR code
        #[arg(long)]
        qr: bool,
    },

    /// Create links for a group invite
    Group {
        /// Group public key (hex)
        #[arg(long)]
        public_key: String,
        /// Group secret (hex)
        #[arg(long)]
        secret: String,
        /// Signature of the secret (hex)
        #[arg(long)]
        secret_sig: String,
        /// Metadata signing public key (hex)
        #[arg(long)]
        sign_pub: String,
        /// Group type: undefined, account, contact, or multi-member
        #[arg(long, default_value = "multi-member")]
        group_type: String,
        /// Display name shown to the invitee
        #[arg(short, long)]
        name: Option<String>,
        /// Also print the internal link as a QR code
        #[arg(long)]
        qr: bool,
    },

    /// Decode a web or internal link
    Decode {
        /// The link (https://berty.tech/id#... or BERTY://PB/...)
        uri: String,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

/// JSON shape of a decoded record; byte fields are hex.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LinkView {
    Contact {
        account_pk: String,
        public_rendezvous_seed: String,
        display_name: String,
    },
    Group {
        public_key: String,
        secret: String,
        secret_sig: String,
        group_type: String,
        sign_pub: String,
        display_name: String,
    },
}

impl From<&LinkRecord> for LinkView {
    fn from(link: &LinkRecord) -> Self {
        match link {
            LinkRecord::ContactInviteV1(id) => LinkView::Contact {
                account_pk: hex::encode(&id.account_pk),
                public_rendezvous_seed: hex::encode(&id.public_rendezvous_seed),
                display_name: id.display_name.clone(),
            },
            LinkRecord::GroupV1(group) => LinkView::Group {
                public_key: hex::encode(&group.group.public_key),
                secret: hex::encode(&group.group.secret),
                secret_sig: hex::encode(&group.group.secret_sig),
                group_type: group.group.group_type.to_string(),
                sign_pub: hex::encode(&group.group.sign_pub),
                display_name: group.display_name.clone(),
            },
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Parse a hex-encoded key field
fn parse_hex(field: &str, s: &str) -> Result<Vec<u8>> {
    hex::decode(s).map_err(|e| anyhow::anyhow!("Invalid hex for {}: {}", field, e))
}

/// Parse a group type name
fn parse_group_type(s: &str) -> Result<GroupType> {
    s.parse::<GroupType>().map_err(|e| anyhow::anyhow!(e))
}

/// Render text as a QR code made of unicode half blocks
fn render_qr(data: &str) -> Result<String> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to build QR code: {:?}", e))?;
    debug!(width = code.width(), "QR code built");

    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

fn print_links(links: &MarshaledLink, qr: bool) -> Result<()> {
    println!("Internal: {}", links.internal);
    println!("Web:      {}", links.web);

    if qr {
        println!();
        println!("{}", render_qr(&links.internal)?);
    }
    Ok(())
}

fn print_record(link: &LinkRecord) {
    match link {
        LinkRecord::ContactInviteV1(id) => {
            println!("Contact invite");
            println!("  Account PK:      {}", hex::encode(&id.account_pk));
            println!("  Rendezvous seed: {}", hex::encode(&id.public_rendezvous_seed));
            print_name(&id.display_name);
        }
        LinkRecord::GroupV1(group) => {
            println!("Group invite");
            println!("  Public key:      {}", hex::encode(&group.group.public_key));
            println!("  Secret:          {}", hex::encode(&group.group.secret));
            println!("  Secret sig:      {}", hex::encode(&group.group.secret_sig));
            println!("  Group type:      {}", group.group.group_type);
            println!("  Sign pub:        {}", hex::encode(&group.group.sign_pub));
            print_name(&group.display_name);
        }
    }
}

fn print_name(name: &str) {
    if name.is_empty() {
        println!("  Display name:    (none)");
    } else {
        println!("  Display name:    {}", name);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Contact {
            account_pk,
            rendezvous_seed,
            name,
            qr,
        } => {
            let id = BertyId::new(
                parse_hex("account-pk", &account_pk)?,
                parse_hex("rendezvous-seed", &rendezvous_seed)?,
            )
            .with_name(name.unwrap_or_default());

            let links = LinkRecord::for_identity(id).marshal()?;
            info!("Contact links created");
            print_links(&links, qr)?;
        }

        Commands::Group {
            public_key,
            secret,
            secret_sig,
            sign_pub,
            group_type,
            name,
            qr,
        } => {
            let group = Group::multi_member(
                parse_hex("public-key", &public_key)?,
                parse_hex("secret", &secret)?,
                parse_hex("secret-sig", &secret_sig)?,
                parse_hex("sign-pub", &sign_pub)?,
            )
            .with_type(parse_group_type(&group_type)?);

            let links =
                LinkRecord::for_group(BertyGroup::new(group).with_name(name.unwrap_or_default()))
                    .marshal()?;
            info!("Group links created");
            print_links(&links, qr)?;
        }

        Commands::Decode { uri, json } => {
            let link = unmarshal(uri.trim())?;
            info!(kind = %link.kind(), "Link decoded");

            if json {
                println!("{}", serde_json::to_string_pretty(&LinkView::from(&link))?);
            } else {
                print_record(&link);
            }
        }
    }

    Ok(())
}
