use super::{AttrValue, Episode, Season, Show};
use std::collections::BTreeMap;
use std::rc::Rc;

type Attributes = BTreeMap<String, AttrValue>;

/// Collects show, season and episode data before the show is frozen.
///
/// Seasons and episodes are created on first mention. Nothing becomes
/// visible to callers until [`ShowBuilder::build`].
#[derive(Debug)]
pub(crate) struct ShowBuilder {
    id: u32,
    data: Attributes,
    seasons: BTreeMap<u32, BTreeMap<u32, Attributes>>,
}

impl ShowBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            data: BTreeMap::new(),
            seasons: BTreeMap::new(),
        }
    }

    pub fn set_show_data(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Makes sure `season` exists even if it ends up without episodes.
    pub fn add_season(&mut self, season: u32) {
        self.seasons.entry(season).or_default();
    }

    /// Sets one episode attribute, creating the season and episode if needed.
    pub fn set_item(&mut self, season: u32, episode: u32, attribute: &str, value: impl Into<AttrValue>) {
        self.seasons
            .entry(season)
            .or_default()
            .entry(episode)
            .or_default()
            .insert(attribute.to_string(), value.into());
    }

    /// Freezes the collected data into a linked show.
    pub fn build(self) -> Rc<Show> {
        let ShowBuilder { id, data, seasons } = self;

        Rc::new_cyclic(|show| {
            let seasons = seasons
                .into_iter()
                .map(|(number, episodes)| {
                    let season = Rc::new_cyclic(|season| Season {
                        number,
                        show: show.clone(),
                        episodes: episodes
                            .into_iter()
                            .map(|(episode_number, attributes)| {
                                let episode = Episode {
                                    season: season.clone(),
                                    attributes,
                                };
                                (episode_number, Rc::new(episode))
                            })
                            .collect(),
                    });
                    (number, season)
                })
                .collect();

            Show {
                id,
                attributes: data,
                seasons,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::attr;
    use super::*;

    #[test]
    fn test_back_references() {
        let mut builder = ShowBuilder::new(12);
        builder.set_show_data(attr::SERIES_NAME, "Scrubs");
        builder.set_item(1, 4, attr::EPISODE_NAME, "My Old Lady");
        builder.set_item(1, 4, attr::EPISODE_NUMBER, 4u32);
        let show = builder.build();

        let season = show.season(1).unwrap();
        let episode = season.episode(4).unwrap();
        assert!(Rc::ptr_eq(&season.show().unwrap(), &show));
        assert!(Rc::ptr_eq(&episode.season().unwrap(), season));
        assert_eq!(episode.name(), Some("My Old Lady"));
        assert_eq!(episode.number(), Some(4));
    }

    #[test]
    fn test_set_item_overwrites() {
        let mut builder = ShowBuilder::new(1);
        builder.set_item(2, 1, attr::EPISODE_NAME, "First");
        builder.set_item(2, 1, attr::EPISODE_NAME, "Second");
        let show = builder.build();
        assert_eq!(show.season(2).unwrap().len(), 1);
        assert_eq!(show.season(2).unwrap().episode(1).unwrap().name(), Some("Second"));
    }

    #[test]
    fn test_dropping_the_show_orphans_seasons() {
        let show = ShowBuilder::new(1).build();
        assert!(show.is_empty());

        let mut builder = ShowBuilder::new(1);
        builder.add_season(3);
        let show = builder.build();
        assert!(show.season(3).unwrap().is_empty());

        let mut builder = ShowBuilder::new(1);
        builder.set_item(1, 1, attr::EPISODE_NAME, "Pilot");
        let show = builder.build();
        let season = Rc::clone(show.season(1).unwrap());
        drop(show);
        assert!(season.show().is_none());
    }
}
