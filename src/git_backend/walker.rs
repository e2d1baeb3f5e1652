use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{Repository, Sort};
use tracing::debug;

use crate::core::{CommitInfo, GraphBuilder, MutableGraph};

/// Feeds the collapsing engine from a real repository: walks the log and
/// produces the row-indexed graph, newest commit in row 0.
pub struct GitWalker {
    repo: Repository,
}

impl GitWalker {
    pub fn new(repo_path: Option<&str>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }
        .context("Failed to open repository")?;

        Ok(Self { repo })
    }

    /// Walk the log into a row-indexed graph. Parents beyond `limit` become
    /// not-loaded stub rows at the bottom.
    pub fn into_graph(&self, limit: Option<usize>) -> Result<MutableGraph> {
        let mut revwalk = self.repo.revwalk()?;

        // Start from HEAD and all branches
        revwalk.push_head()?;
        for branch in self.repo.branches(None)? {
            let (branch, _) = branch?;
            if let Some(target) = branch.get().target() {
                revwalk.push(target)?;
            }
        }

        // Topological order keeps every child above its parents
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut builder = GraphBuilder::new();
        let mut count = 0;
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            let parents: Vec<String> = commit.parent_ids().map(|id| id.to_string()).collect();
            let timestamp = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .context("Invalid commit timestamp")?;
            let info = CommitInfo {
                id: oid.to_string(),
                author: commit.author().name().unwrap_or("Unknown").to_string(),
                message: commit.summary().unwrap_or("").to_string(),
                timestamp,
            };
            builder.add_commit(info, parents);

            count += 1;
            if let Some(limit) = limit {
                if count >= limit {
                    break;
                }
            }
        }

        debug!(commits = count, "walked repository log");
        Ok(builder.build())
    }

    /// Current HEAD commit id, if any.
    pub fn head(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) => Ok(head.target().map(|oid| oid.to_string())),
            Err(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeId;
    use git2::{Commit, Oid, Signature};
    use tempfile::TempDir;

    fn create_test_repo() -> Result<(TempDir, Repository)> {
        let dir = TempDir::new()?;
        let repo = Repository::init(dir.path())?;

        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        Ok((dir, repo))
    }

    fn commit_to_repo(
        repo: &Repository,
        message: &str,
        parents: &[&Commit],
        update_ref: Option<&str>,
    ) -> Result<Oid> {
        let sig = Signature::now("Test User", "test@example.com")?;
        let tree_id = {
            let mut index = repo.index()?;
            index.write_tree()?
        };
        let tree = repo.find_tree(tree_id)?;

        Ok(repo.commit(update_ref, &sig, &sig, message, &tree, parents)?)
    }

    #[test]
    fn linear_history_lands_newest_first() -> Result<()> {
        let (_dir, repo) = create_test_repo()?;

        let oid1 = commit_to_repo(&repo, "First commit", &[], Some("HEAD"))?;
        let commit1 = repo.find_commit(oid1)?;
        let oid2 = commit_to_repo(&repo, "Second commit", &[&commit1], Some("HEAD"))?;
        let commit2 = repo.find_commit(oid2)?;
        let oid3 = commit_to_repo(&repo, "Third commit", &[&commit2], Some("HEAD"))?;

        let walker = GitWalker::new(Some(repo.path().to_str().unwrap()))?;
        let graph = walker.into_graph(None)?;

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.commit(NodeId(0)).unwrap().id, oid3.to_string());
        assert_eq!(graph.commit(NodeId(2)).unwrap().id, oid1.to_string());
        assert_eq!(graph.stats().edge_count, 2);
        assert_eq!(walker.head()?, Some(oid3.to_string()));

        Ok(())
    }

    #[test]
    fn merge_history_is_wired_through() -> Result<()> {
        let (_dir, repo) = create_test_repo()?;

        let base_oid = commit_to_repo(&repo, "Base commit", &[], Some("HEAD"))?;
        let base_commit = repo.find_commit(base_oid)?;
        let branch1_oid = commit_to_repo(&repo, "Branch 1", &[&base_commit], Some("HEAD"))?;
        let branch1_commit = repo.find_commit(branch1_oid)?;
        let branch2_oid = commit_to_repo(&repo, "Branch 2", &[&base_commit], None)?;
        let branch2_commit = repo.find_commit(branch2_oid)?;
        let _merge_oid = commit_to_repo(
            &repo,
            "Merge",
            &[&branch1_commit, &branch2_commit],
            Some("HEAD"),
        )?;

        let walker = GitWalker::new(Some(repo.path().to_str().unwrap()))?;
        let graph = walker.into_graph(None)?;

        assert_eq!(graph.node_count(), 4);
        let stats = graph.stats();
        assert_eq!(stats.merge_commits, 1);
        assert_eq!(stats.edge_count, 4);
        // merge sits on top with two down-edges
        assert_eq!(graph.down_edges(NodeId(0)).len(), 2);

        Ok(())
    }

    #[test]
    fn limit_cuts_history_into_stubs() -> Result<()> {
        let (_dir, repo) = create_test_repo()?;

        let oid1 = commit_to_repo(&repo, "First commit", &[], Some("HEAD"))?;
        let commit1 = repo.find_commit(oid1)?;
        let oid2 = commit_to_repo(&repo, "Second commit", &[&commit1], Some("HEAD"))?;
        let commit2 = repo.find_commit(oid2)?;
        let _oid3 = commit_to_repo(&repo, "Third commit", &[&commit2], Some("HEAD"))?;

        let walker = GitWalker::new(Some(repo.path().to_str().unwrap()))?;
        let graph = walker.into_graph(Some(2))?;

        // two loaded commits plus a stub for the cut-off parent
        assert_eq!(graph.node_count(), 3);
        let stats = graph.stats();
        assert_eq!(stats.commit_nodes, 2);
        assert_eq!(stats.not_loaded_nodes, 1);
        assert_eq!(graph.commit_node_in_row(2), None);

        Ok(())
    }
}
