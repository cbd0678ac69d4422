//! Dispatch of parsed commands to [`RocketChatClient`]; every result is rendered as JSON.

use anyhow::{Context, Result};
use rc_client::{
    AdvancedSearchParams, AnalysisRequest, DateWindow, HistoryQuery, NewRoom, Page,
    RocketChatClient, RoomAnalyticsOptions, UploadRequest, UserLookup,
};
use serde_json::{json, Value};

use crate::cli::Commands;

fn render<T: serde::Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("failed to render result as JSON")
}

fn done(action: &str) -> Value {
    json!({ "success": true, "action": action })
}

pub async fn execute(client: &RocketChatClient, command: Commands) -> Result<Value> {
    let output = match command {
        Commands::Send { room, text, thread } => {
            render(client.send_message(&room, &text, thread.as_deref()).await?)?
        }
        Commands::GetMessage { id } => render(client.get_message(&id).await?)?,
        Commands::Edit { room, id, text } => render(client.update_message(&room, &id, &text).await?)?,
        Commands::Delete { room, id } => {
            client.delete_message(&room, &id).await?;
            done("delete")
        }
        Commands::React { id, emoji, remove } => {
            client.react(&id, &emoji, !remove).await?;
            done(if remove { "unreact" } else { "react" })
        }
        Commands::Pin { id, undo } => {
            if undo {
                client.unpin_message(&id).await?;
                done("unpin")
            } else {
                client.pin_message(&id).await?;
                done("pin")
            }
        }
        Commands::Star { id, undo } => {
            if undo {
                client.unstar_message(&id).await?;
                done("unstar")
            } else {
                client.star_message(&id).await?;
                done("star")
            }
        }
        Commands::Thread { id, count } => render(client.thread_messages(&id, count).await?)?,
        Commands::History { room, count } => {
            render(client.room_messages(&room, HistoryQuery::recent(count)).await?)?
        }
        Commands::Members { room, count } => {
            render(client.room_members(&room, Page::first(count)).await?)?
        }
        Commands::Files { room, count } => render(client.room_files(&room, Page::first(count)).await?)?,
        Commands::Counters { room } => render(client.room_counters(&room).await?)?,
        Commands::Invite { room, user_id } => {
            json!({ "success": true, "kind": client.invite_user(&room, &user_id).await? })
        }
        Commands::Kick { room, user_id } => {
            json!({ "success": true, "kind": client.remove_user(&room, &user_id).await? })
        }
        Commands::Announce { room, text } => {
            json!({ "success": true, "kind": client.set_announcement(&room, &text).await? })
        }
        Commands::Describe { room, text } => {
            json!({ "success": true, "kind": client.set_description(&room, &text).await? })
        }
        Commands::Topic { room, text } => {
            json!({ "success": true, "topic": client.set_topic(&room, &text).await? })
        }
        Commands::RoomInfo { reference } => render(client.room_info(&reference).await?)?,
        Commands::Rooms => render(client.list_rooms().await?)?,
        Commands::CreateRoom {
            name,
            private,
            read_only,
            members,
        } => {
            let room = NewRoom {
                name,
                members,
                read_only,
                private,
            };
            render(client.create_room(&room).await?)?
        }
        Commands::Dm { username } => render(client.open_direct_message(&username).await?)?,
        Commands::User { username } => {
            render(client.user_info(UserLookup::Username(&username)).await?)?
        }
        Commands::Me => render(client.me().await?)?,
        Commands::Upload {
            room,
            path,
            message,
            description,
            thread,
            mime,
        } => {
            let request = UploadRequest {
                path,
                mime_type: mime,
                message,
                description,
                thread_id: thread,
            };
            render(client.upload_file(&room, &request).await?)?
        }
        Commands::Download { id, name, dest } => {
            render(client.download_file(&id, &name, &dest).await?)?
        }
        Commands::Search { query, room, limit } => {
            render(client.search_messages(&query, room.as_deref(), limit).await?)?
        }
        Commands::AdvancedSearch {
            query,
            room,
            user,
            from,
            to,
            kind,
            sort_by,
            order,
            limit,
        } => {
            let params = AdvancedSearchParams {
                query,
                room_id: room,
                user_id: user,
                date_from: from,
                date_to: to,
                message_type: kind,
                sort_by,
                sort_order: order,
                limit,
            };
            render(client.advanced_search(&params).await?)?
        }
        Commands::GlobalSearch { query, limit } => render(client.global_search(&query, limit).await?)?,
        Commands::Analytics {
            room,
            messages,
            from,
            to,
            skip_messages,
            skip_files,
            skip_members,
        } => {
            let options = RoomAnalyticsOptions {
                message_sample: messages,
                window: DateWindow::new(from, to),
                include_messages: !skip_messages,
                include_files: !skip_files,
                include_members: !skip_members,
            };
            render(client.room_analytics(&room, options).await?)?
        }
        Commands::Activity {
            user,
            from,
            to,
            sample,
        } => render(
            client
                .user_activity(&user, DateWindow::new(from, to), sample)
                .await?,
        )?,
        Commands::Analyze {
            room,
            kind,
            prompt,
            count,
        } => {
            let request = AnalysisRequest { kind, prompt };
            let prompt = client.analysis_prompt(&room, &request, count).await?;
            json!({ "success": true, "room_id": room, "prompt": prompt })
        }
    };
    Ok(output)
}
